use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or a plain file
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> std::io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::{BufRead, Write};

    #[rstest]
    #[case("regions.bed", false)]
    #[case("regions.bed.gz", true)]
    fn test_get_dynamic_reader(#[case] name: &str, #[case] gzipped: bool) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join(name);
        let file = File::create(&path).unwrap();
        if gzipped {
            let mut encoder = GzEncoder::new(file, Compression::default());
            writeln!(encoder, "chr1\t10\t20").unwrap();
            encoder.finish().unwrap();
        } else {
            let mut file = file;
            writeln!(file, "chr1\t10\t20").unwrap();
        }

        let lines: Vec<String> = get_dynamic_reader(&path)
            .unwrap()
            .lines()
            .collect::<std::io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["chr1\t10\t20"]);
    }
}
