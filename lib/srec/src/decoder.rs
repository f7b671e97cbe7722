use crate::checksum::checksum;
use crate::errors::{ChecksumMismatch, Error, MalformedRecord};
use crate::record::RecordKind;
use crate::MemoryImage;
use std::io::{self, BufRead, Read};

/// Decoder for streams of S-records. It turns a sequence of text lines into
/// a memory image, skipping the records which do not carry addressed data
/// and, if asked to, verifying the checksum of the ones that do.
#[derive(Debug)]
pub struct Decoder {
    verify: bool,
    line: usize,
    warnings: Vec<ChecksumMismatch>,
}

impl Decoder {
    /// Returns a new decoder. With `verify` set, the checksum of each data
    /// record is recomputed and compared against the declared one, with
    /// mismatches accumulated as warnings instead of aborting the decode.
    pub fn new(verify: bool) -> Self {
        Self {
            verify,
            line: 0,
            warnings: vec![],
        }
    }

    /// Decode everything read from `reader` into a memory image. Lines are
    /// trimmed of surrounding whitespace and empty ones are skipped; a stream
    /// with no data records at all simply yields an empty image. The first
    /// structurally invalid record aborts the whole call: past a length
    /// mismatch, address offsets cannot be trusted anymore.
    ///
    /// Each call is independent from the previous ones and starts with a
    /// fresh image and a fresh warning list.
    pub fn decode(&mut self, reader: impl Read) -> Result<MemoryImage, Error> {
        self.line = 0;
        self.warnings.clear();

        let mut image = MemoryImage::new();
        for line in io::BufReader::new(reader).lines() {
            let record = line?;
            let record = record.trim();
            if !record.is_empty() {
                self.decode_line(record, &mut image)?;
            }
            self.line += 1;
        }

        Ok(image)
    }

    /// Returns the checksum mismatches found by the last call to `decode`.
    pub fn warnings(&self) -> &[ChecksumMismatch] {
        &self.warnings
    }

    // Decode a single trimmed, non-empty `record` into `image`.
    fn decode_line(
        &mut self,
        record: &str,
        image: &mut MemoryImage,
    ) -> Result<(), MalformedRecord> {
        // Fields are sliced at fixed byte offsets, so reject anything outside
        // of ASCII right away.
        if !record.is_ascii() {
            return Err(self.malformed(record, "record contains non-ASCII characters"));
        }

        // The 'S' marker plus the type digit.
        let mut chars = record.chars();
        if chars.next() != Some('S') {
            return Err(self.malformed(record, "record does not start with the 'S' marker"));
        }
        let kind = match chars.next().and_then(RecordKind::from_digit) {
            Some(kind) => kind,
            None => return Err(self.malformed(record, "unrecognized record type")),
        };

        // The count field declares how many hex pairs follow it: address,
        // data and checksum. The rest of the line has to match it exactly.
        if record.len() < 4 {
            return Err(self.malformed(record, "record is too short"));
        }
        let count = self.hex_field(record, 2, 4)? as usize;
        if record.len() != 4 + 2 * count {
            return Err(self.malformed(record, "record length does not match its count field"));
        }

        // Records which do not carry addressed data are skipped without any
        // further parsing.
        let Some(width) = kind.data_address_width() else {
            return Ok(());
        };

        // The count has to cover at least the address and checksum fields.
        if 2 * count < width + 2 {
            return Err(self.malformed(record, "count field does not cover the address field"));
        }

        // Everything past the count field has to be made of hex pairs.
        if !record[4..].chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.malformed(record, "malformed hex value"));
        }

        // If asked to, verify the checksum, which covers everything from the
        // count field up to the data payload. A mismatch is only worth a
        // warning: the record is imported anyway with its declared payload.
        let data_end = record.len() - 2;
        if self.verify {
            let expected = checksum(&record[2..data_end]);
            let found = self.hex_field(record, data_end, record.len())? as u8;
            if expected != found {
                self.warnings.push(ChecksumMismatch {
                    line: self.line,
                    record: record.to_string(),
                    expected,
                    found,
                });
            }
        }

        // Write each data byte at consecutive addresses, starting at the one
        // given by the address field. An address written twice keeps the
        // value that came last.
        let mut address = self.hex_field(record, 4, 4 + width)?;
        let mut offset = 4 + width;
        while offset < data_end {
            let value = self.hex_field(record, offset, offset + 2)? as u8;
            image.insert(address, value);

            offset += 2;
            if offset < data_end {
                address = match address.checked_add(1) {
                    Some(next) => next,
                    None => {
                        return Err(self
                            .malformed(record, "record runs past the last representable address"))
                    }
                };
            }
        }

        Ok(())
    }

    // Returns the number contained in `record` between the `start` and `end`
    // byte offsets, interpreted as a big-endian hex value. Offsets are the
    // caller's to keep in range.
    fn hex_field(
        &self,
        record: &str,
        start: usize,
        end: usize,
    ) -> Result<u32, MalformedRecord> {
        let field = &record[start..end];
        if !field.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.malformed(record, "malformed hex value"));
        }

        // The digits were just validated and fields are at most eight
        // characters wide, so this cannot fail.
        Ok(u32::from_str_radix(field, 16).unwrap())
    }

    // Returns a MalformedRecord for the given `record` at the current line.
    fn malformed(&self, record: &str, message: &str) -> MalformedRecord {
        MalformedRecord {
            line: self.line,
            record: record.to_string(),
            message: message.to_string(),
        }
    }
}
