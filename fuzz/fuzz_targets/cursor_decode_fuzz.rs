//! Fuzz test for the cursor token decoder
//!
//! Cursor tokens arrive straight from query strings, so the decoder must
//! handle any input without panicking. Anything it accepts must be exactly
//! what the encoder would produce for the decoded cursor.
//!
//! Run with: cargo +nightly fuzz run cursor_decode_fuzz -- -max_total_time=60

#![no_main]

use folio_core::{CursorCodec, FolioError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };

    match CursorCodec::decode(token) {
        Ok(cursor) => {
            assert_eq!(
                CursorCodec::encode(&cursor),
                token,
                "Accepted token must be canonical"
            );
        }
        Err(FolioError::InvalidCursor(_)) => {}
        Err(other) => panic!("Decode failed with a non-cursor error: {:?}", other),
    }
});
