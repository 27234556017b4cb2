//! VCF text input layer
//!
//! Opens plain, gzip- or bzip2-compressed VCF files, scans the header, and
//! serves record lines one at a time from a reused buffer. Large plain-text
//! files are memory mapped; everything else goes through buffered readers.

use crate::core::buffer::SlotBuffer;
use crate::core::engine::VcfSource;
use crate::core::error::{HeaderError, Result, VcfError};
use crate::record::fields::parse_fixed_fields;
use crate::record::Variant;
use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for buffered readers (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Threshold above which plain files are memory mapped (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz), including BGZF multi-member streams
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from the file extension, falling back to magic
/// bytes.
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    // BZ2 magic: "BZh"
    if bytes_read >= 3 && &magic == b"BZh" {
        return Ok(CompressionFormat::Bzip2);
    }

    Ok(CompressionFormat::Plain)
}

/// Memory-mapped file reader
struct MappedReader {
    mmap: Mmap,
    position: usize,
}

impl MappedReader {
    fn new(file: &File) -> io::Result<Self> {
        // SAFETY: We assume the file won't be modified while mapped
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.position..];
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read;
        Ok(to_read)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.position..])
    }

    fn consume(&mut self, amt: usize) {
        self.position = std::cmp::min(self.position + amt, self.mmap.len());
    }
}

/// Open a VCF file with the reading strategy matching its format and size.
fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    let format = detect_compression(path)?;
    let file = File::open(path)?;

    match format {
        CompressionFormat::Gzip => {
            // MultiGzDecoder handles the concatenated members of BGZF files
            let decoder = flate2::read::MultiGzDecoder::new(file);
            Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder)))
        }
        CompressionFormat::Bzip2 => {
            let decoder = bzip2::read::BzDecoder::new(file);
            Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder)))
        }
        CompressionFormat::Plain => {
            if file.metadata()?.len() >= MMAP_THRESHOLD {
                Ok(Box::new(MappedReader::new(&file)?))
            } else {
                Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)))
            }
        }
    }
}

/// Sequential record-line source for one VCF text file.
///
/// Construction consumes the `##` metadata lines and the `#CHROM`
/// column-header line; afterwards [`next_line`](VcfLineReader::next_line)
/// yields one record line at a time with the terminator stripped.
pub struct VcfLineReader {
    reader: Box<dyn BufRead + Send>,
    buffer: Vec<u8>,
    line_number: u64,
    sample_count: usize,
    samples: Vec<String>,
}

impl VcfLineReader {
    /// Open a VCF file (plain, gzip or bzip2) and scan its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = open_reader(path.as_ref())?;
        Self::from_reader(reader)
    }

    /// Build from any buffered reader, scanning the header immediately.
    pub fn from_reader(reader: Box<dyn BufRead + Send>) -> Result<Self> {
        let mut source = Self {
            reader,
            buffer: Vec::with_capacity(4096),
            line_number: 0,
            sample_count: 0,
            samples: Vec::new(),
        };
        source.scan_header()?;
        Ok(source)
    }

    /// Consume metadata lines up to and including the `#CHROM` line,
    /// deriving the sample count from its column layout.
    fn scan_header(&mut self) -> Result<()> {
        loop {
            self.buffer.clear();
            let n = self.reader.read_until(b'\n', &mut self.buffer)?;
            if n == 0 {
                return Err(VcfError::Header(HeaderError::MissingColumnHeader));
            }
            self.line_number += 1;
            trim_terminator(&mut self.buffer);

            if self.buffer.is_empty() {
                continue;
            }
            if self.buffer.starts_with(b"#CHROM") {
                let header = String::from_utf8_lossy(&self.buffer);
                let columns: Vec<&str> = header.split('\t').collect();
                if columns.len() < 8 {
                    return Err(VcfError::Header(HeaderError::TruncatedColumnHeader {
                        found: columns.len(),
                    }));
                }
                // 8 fixed columns plus FORMAT precede the sample names
                self.samples = columns.iter().skip(9).map(|s| s.to_string()).collect();
                self.sample_count = self.samples.len();
                debug!("header declares {} samples", self.sample_count);
                return Ok(());
            }
            if !self.buffer.starts_with(b"#") {
                // Data started without a column-header line
                return Err(VcfError::Header(HeaderError::MissingColumnHeader));
            }
        }
    }

    /// Read the next non-empty line into the internal buffer.
    /// Returns false at end of input.
    fn fill_next_line(&mut self) -> io::Result<bool> {
        loop {
            self.buffer.clear();
            let n = self.reader.read_until(b'\n', &mut self.buffer)?;
            if n == 0 {
                return Ok(false);
            }
            self.line_number += 1;
            trim_terminator(&mut self.buffer);
            if !self.buffer.is_empty() {
                return Ok(true);
            }
        }
    }

    /// Next record line without its terminator; `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        if self.fill_next_line()? {
            Ok(Some(&self.buffer))
        } else {
            Ok(None)
        }
    }

    /// Number of per-sample columns declared by the header line.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Sample names in column order.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// 1-based number of the line most recently returned.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl VcfSource for VcfLineReader {
    fn sample_count(&self) -> usize {
        self.sample_count
    }

    fn next_record(&mut self, slot: &mut SlotBuffer) -> Result<Option<(Variant, u64)>> {
        if !self.fill_next_line()? {
            return Ok(None);
        }
        let (variant, suffix) =
            parse_fixed_fields(&self.buffer, self.sample_count, self.line_number)?;
        slot.fill(suffix)?;
        Ok(Some((variant, self.line_number)))
    }
}

fn trim_terminator(buffer: &mut Vec<u8>) {
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "\
##fileformat=VCFv4.2
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE1\tSAMPLE2
";

    fn reader_from(content: &str) -> Result<VcfLineReader> {
        VcfLineReader::from_reader(Box::new(std::io::Cursor::new(content.as_bytes().to_vec())))
    }

    #[test]
    fn test_header_sample_count() {
        let source = reader_from(HEADER).unwrap();
        assert_eq!(source.sample_count(), 2);
        assert_eq!(source.samples(), &["SAMPLE1", "SAMPLE2"]);
    }

    #[test]
    fn test_header_without_samples() {
        let content = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";
        let source = reader_from(content).unwrap();
        assert_eq!(source.sample_count(), 0);
    }

    #[test]
    fn test_missing_column_header() {
        let content = "##fileformat=VCFv4.2\n##contig=<ID=chr1>\n";
        let err = reader_from(content).unwrap_err();
        assert!(matches!(
            err,
            VcfError::Header(HeaderError::MissingColumnHeader)
        ));
    }

    #[test]
    fn test_data_before_column_header() {
        let content = "##fileformat=VCFv4.2\nchr1\t100\t.\tA\tG\t.\t.\t.\n";
        let err = reader_from(content).unwrap_err();
        assert!(matches!(
            err,
            VcfError::Header(HeaderError::MissingColumnHeader)
        ));
    }

    #[test]
    fn test_truncated_column_header() {
        let content = "#CHROM\tPOS\tID\n";
        let err = reader_from(content).unwrap_err();
        assert!(matches!(
            err,
            VcfError::Header(HeaderError::TruncatedColumnHeader { found: 3 })
        ));
    }

    #[test]
    fn test_next_line_strips_terminators() {
        let content = format!("{}chr1\t100\t.\tA\tG\t.\t.\t.\r\nchr1\t200\t.\tC\tT\t.\t.\t.\n", HEADER);
        let mut source = reader_from(&content).unwrap();
        assert_eq!(
            source.next_line().unwrap(),
            Some(&b"chr1\t100\t.\tA\tG\t.\t.\t."[..])
        );
        assert_eq!(
            source.next_line().unwrap(),
            Some(&b"chr1\t200\t.\tC\tT\t.\t.\t."[..])
        );
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let content = format!("{}\nchr1\t100\t.\tA\tG\t.\t.\t.\n\n", HEADER);
        let mut source = reader_from(&content).unwrap();
        assert!(source.next_line().unwrap().is_some());
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn test_line_numbers_track_file_lines() {
        let content = format!("{}chr1\t100\t.\tA\tG\t.\t.\t.\n", HEADER);
        let mut source = reader_from(&content).unwrap();
        // Header occupies the first three lines
        assert_eq!(source.line_number(), 3);
        source.next_line().unwrap();
        assert_eq!(source.line_number(), 4);
    }

    #[test]
    fn test_gzip_input() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(format!("{}chr1\t100\t.\tA\tG\t.\t.\t.\n", HEADER).as_bytes())
            .unwrap();
        let gz_data = encoder.finish().unwrap();

        let mut temp = tempfile::Builder::new()
            .suffix(".vcf.gz")
            .tempfile()
            .unwrap();
        temp.write_all(&gz_data).unwrap();
        temp.flush().unwrap();

        let mut source = VcfLineReader::open(temp.path()).unwrap();
        assert_eq!(source.sample_count(), 2);
        assert!(source.next_line().unwrap().is_some());
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn test_detect_gzip_by_magic_bytes() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"payload").unwrap();
        let gz_data = encoder.finish().unwrap();

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&gz_data).unwrap();
        temp.flush().unwrap();

        let format = detect_compression(temp.path()).unwrap();
        assert_eq!(format, CompressionFormat::Gzip);
    }

    #[test]
    fn test_detect_plain() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"##fileformat=VCFv4.2\n").unwrap();
        temp.flush().unwrap();
        assert_eq!(
            detect_compression(temp.path()).unwrap(),
            CompressionFormat::Plain
        );
    }
}
