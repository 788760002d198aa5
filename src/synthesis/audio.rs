//! WAV header parsing for measured audio duration

/// Read the playback duration of a WAV file from its header
///
/// Walks the RIFF chunk list for the `fmt ` byte rate and the `data` chunk
/// size; duration is `data_size / byte_rate`. Only the header needs to be
/// present, so callers can pass a file prefix instead of the whole artifact.
/// Returns `None` for anything that is not a parseable WAV, letting callers
/// fall back to an estimate.
pub fn wav_duration_secs(bytes: &[u8]) -> Option<f64> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }

    let mut byte_rate: Option<u32> = None;
    let mut data_size: Option<u32> = None;

    let mut offset = 12;
    while offset + 8 <= bytes.len() {
        let chunk_id = &bytes[offset..offset + 4];
        let chunk_size = u32::from_le_bytes([
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]);

        match chunk_id {
            b"fmt " => {
                // byte rate sits at offset 8 within the fmt chunk
                let rate_at = offset + 8 + 8;
                if rate_at + 4 <= bytes.len() {
                    byte_rate = Some(u32::from_le_bytes([
                        bytes[rate_at],
                        bytes[rate_at + 1],
                        bytes[rate_at + 2],
                        bytes[rate_at + 3],
                    ]));
                }
            }
            b"data" => {
                // The data chunk body may extend past a truncated prefix;
                // the declared size is all we need
                data_size = Some(chunk_size);
            }
            _ => {}
        }

        if byte_rate.is_some() && data_size.is_some() {
            break;
        }

        // Chunks are word-aligned
        let padded = chunk_size as usize + (chunk_size as usize & 1);
        offset = offset.checked_add(8 + padded)?;
    }

    match (byte_rate, data_size) {
        (Some(rate), Some(size)) if rate > 0 => Some(size as f64 / rate as f64),
        _ => None,
    }
}
