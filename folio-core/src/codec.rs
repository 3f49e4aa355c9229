//! Opaque cursor token codec.
//!
//! Tokens are a versioned JSON envelope, `{"v":1,"c":<cursor>}`, in the
//! URL-safe base64 alphabet without padding. The codec does not try to hide
//! anything from clients; it only guarantees that a token it did not
//! produce is rejected instead of being turned into a bogus page.
//!
//! # Canonical form
//!
//! After a token decodes, it is re-encoded and compared byte-for-byte with
//! the input. Hand-edited payloads (reordered fields, extra whitespace,
//! padded base64) therefore fail with [`CursorError::NonCanonical`] even if
//! they describe a structurally valid cursor.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::constants::{CURSOR_VERSION, MAX_CURSOR_TOKEN_LEN};
use crate::{Cursor, CursorError, FolioResult, OffsetCursor, SnapshotCursor};

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    v: u8,
    c: &'a Cursor,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    #[allow(dead_code)]
    v: u8,
    c: Cursor,
}

#[derive(Deserialize)]
struct VersionProbe {
    v: u8,
}

/// Encodes and decodes opaque cursor tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorCodec;

impl CursorCodec {
    /// Encode a cursor into a URL-safe token.
    pub fn encode(cursor: &Cursor) -> String {
        let envelope = EnvelopeRef {
            v: CURSOR_VERSION,
            c: cursor,
        };
        // Integers, UUIDs, and strings only.
        let json = serde_json::to_vec(&envelope).expect("cursor serialization is infallible");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a token into a cursor of either shape.
    pub fn decode(token: &str) -> FolioResult<Cursor> {
        Ok(Self::try_decode(token)?)
    }

    /// Decode a token that must be a limit/offset cursor.
    pub fn decode_offset(token: &str) -> FolioResult<OffsetCursor> {
        match Self::try_decode(token)? {
            Cursor::LimitOffset(cursor) => Ok(cursor),
            other => Err(CursorError::ShapeMismatch {
                expected: Cursor::LIMIT_OFFSET,
                found: other.shape(),
            }
            .into()),
        }
    }

    /// Decode a token that must be a snapshot cursor.
    pub fn decode_snapshot(token: &str) -> FolioResult<SnapshotCursor> {
        match Self::try_decode(token)? {
            Cursor::Snapshot(cursor) => Ok(cursor),
            other => Err(CursorError::ShapeMismatch {
                expected: Cursor::SNAPSHOT,
                found: other.shape(),
            }
            .into()),
        }
    }

    fn try_decode(token: &str) -> Result<Cursor, CursorError> {
        if token.is_empty() {
            return Err(CursorError::Empty);
        }
        if token.len() > MAX_CURSOR_TOKEN_LEN {
            return Err(CursorError::TooLong {
                len: token.len(),
                max: MAX_CURSOR_TOKEN_LEN,
            });
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| CursorError::Encoding {
                reason: e.to_string(),
            })?;

        let probe: VersionProbe =
            serde_json::from_slice(&bytes).map_err(|e| CursorError::Payload {
                reason: e.to_string(),
            })?;
        if probe.v != CURSOR_VERSION {
            return Err(CursorError::UnsupportedVersion { version: probe.v });
        }

        let envelope: Envelope =
            serde_json::from_slice(&bytes).map_err(|e| CursorError::Payload {
                reason: e.to_string(),
            })?;

        validate(&envelope.c)?;

        if Self::encode(&envelope.c) != token {
            return Err(CursorError::NonCanonical);
        }

        Ok(envelope.c)
    }
}

fn validate(cursor: &Cursor) -> Result<(), CursorError> {
    match cursor {
        Cursor::LimitOffset(c) if c.limit == 0 => Err(CursorError::InvalidField {
            field: "limit".to_string(),
            reason: "must be at least 1".to_string(),
        }),
        Cursor::Snapshot(c) if c.page_size == 0 => Err(CursorError::InvalidField {
            field: "page_size".to_string(),
            reason: "must be at least 1".to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// TESTS
// =============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
