use crate::checksum::checksum;
use crate::MemoryImage;

// Size in bytes of the address field on emitted records. Output always uses
// 'S3' records, which carry 32-bit addresses, no matter which widths were
// present on input.
const ADDRESS_BYTES: usize = 4;

/// Largest amount of data bytes that fits on a single record: the count
/// field is one byte and covers the address, the data and the checksum.
pub const MAX_BYTES_PER_LINE: usize = 0xFF - ADDRESS_BYTES - 1;

/// Encode the given `image` into a list of 'S3' record lines, with at most
/// `bytes_per_line` data bytes on each of them. Addresses are walked in
/// ascending order and packed into maximal contiguous runs: a run is closed
/// by the end of the image, by a gap between consecutive addresses, or by
/// hitting the line cap. The output is fully determined by the image and the
/// cap, and an empty image encodes to no lines at all.
///
/// `bytes_per_line` is the caller's to keep within `1..=MAX_BYTES_PER_LINE`;
/// anything else panics.
pub fn encode(image: &MemoryImage, bytes_per_line: usize) -> Vec<String> {
    assert!(bytes_per_line > 0, "at least one byte per line is needed");
    assert!(
        bytes_per_line <= MAX_BYTES_PER_LINE,
        "a line can hold {} data bytes at most",
        MAX_BYTES_PER_LINE
    );

    let mut lines = vec![];
    let mut payload = String::new();
    let mut run_start = 0;

    let mut entries = image.iter().peekable();
    while let Some((&address, &value)) = entries.next() {
        if payload.is_empty() {
            run_start = address;
        }
        payload.push_str(&format!("{:02X}", value));

        // The run is closed when this was the last address, when the next
        // one does not follow the current one, or when the line already
        // holds as many bytes as requested.
        let contiguous = match (entries.peek(), address.checked_add(1)) {
            (Some((&next, _)), Some(successor)) => next == successor,
            _ => false,
        };
        if !contiguous || payload.len() == 2 * bytes_per_line {
            lines.push(emit(run_start, &payload));
            payload.clear();
        }
    }

    lines
}

// Serialize a single run starting at `address` and holding the hex pairs in
// `payload` as an 'S3' record.
fn emit(address: u32, payload: &str) -> String {
    let count = ADDRESS_BYTES + payload.len() / 2 + 1;
    let fields = format!("{:02X}{:08X}{}", count, address, payload);

    format!("S3{}{:02X}", fields, checksum(&fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;

    #[test]
    fn encode_a_single_byte() {
        let image = MemoryImage::from([(0x12345678, 0x9A)]);

        assert_eq!(encode(&image, 20), vec!["S306123456789A4B"]);
    }

    #[test]
    fn encode_a_contiguous_run_on_one_line() {
        let image = MemoryImage::from([(0, 0xA0), (1, 0xA1), (2, 0xA2), (3, 0xA3)]);

        assert_eq!(encode(&image, 20), vec!["S30900000000A0A1A2A370"]);
        assert_eq!(encode(&image, 4), vec!["S30900000000A0A1A2A370"]);
    }

    #[test]
    fn encode_splits_on_the_line_cap() {
        let image = MemoryImage::from([(0, 0xA0), (1, 0xA1), (2, 0xA2), (3, 0xA3)]);

        assert_eq!(
            encode(&image, 2),
            vec!["S30700000000A0A1B7", "S30700000002A2A3B1"]
        );
        assert_eq!(
            encode(&image, 1),
            vec![
                "S30600000000A059",
                "S30600000001A157",
                "S30600000002A255",
                "S30600000003A353"
            ]
        );
    }

    #[test]
    fn encode_splits_on_address_gaps() {
        let image = MemoryImage::from([(0, 0xA0), (1, 0xA1), (3, 0xA3), (4, 0xA4)]);

        let lines = encode(&image, 16);
        assert_eq!(lines.len(), 2);

        // And no data is lost across the split.
        let decoded = Decoder::new(true)
            .decode(lines.join("\n").as_bytes())
            .unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn encode_an_empty_image() {
        assert!(encode(&MemoryImage::new(), 16).is_empty());
    }

    #[test]
    fn encode_at_the_last_representable_address() {
        // The run ending exactly at the last address must not trip on the
        // address successor computation.
        let image = MemoryImage::from([(u32::MAX - 1, 0x01), (u32::MAX, 0x02)]);

        let lines = encode(&image, 16);
        assert_eq!(lines.len(), 1);

        let decoded = Decoder::new(true)
            .decode(lines.join("\n").as_bytes())
            .unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn round_trip() {
        let mut image = MemoryImage::new();
        for address in 0..40 {
            image.insert(address, address as u8);
        }
        for address in 0x8000..0x8007 {
            image.insert(address, 0xEE);
        }
        image.insert(u32::MAX, 0x7F);

        for bytes_per_line in [1, 2, 3, 16, MAX_BYTES_PER_LINE] {
            let lines = encode(&image, bytes_per_line);

            let mut decoder = Decoder::new(true);
            let decoded = decoder.decode(lines.join("\n").as_bytes()).unwrap();

            assert_eq!(decoded, image);
            assert!(decoder.warnings().is_empty());
        }
    }

    #[test]
    fn encoding_again_is_idempotent() {
        let image = MemoryImage::from([(0, 0xA0), (1, 0xA1), (3, 0xA3), (4, 0xA4)]);

        for bytes_per_line in [1, 2, 16] {
            let lines = encode(&image, bytes_per_line);
            let decoded = Decoder::new(false)
                .decode(lines.join("\n").as_bytes())
                .unwrap();

            assert_eq!(encode(&decoded, bytes_per_line), lines);
        }
    }

    #[test]
    #[should_panic]
    fn zero_bytes_per_line_is_a_caller_bug() {
        encode(&MemoryImage::from([(0, 0x00)]), 0);
    }

    #[test]
    #[should_panic]
    fn an_oversized_line_cap_is_a_caller_bug() {
        encode(&MemoryImage::from([(0, 0x00)]), MAX_BYTES_PER_LINE + 1);
    }
}
