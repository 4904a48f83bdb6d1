use std::io::Write;

use stitchplot::StitchSamples;

const FASTQ: &[u8] = b"@r1_45_2\nACGTACGT\n+\nIIIIIIII\n@r2_38_0\nACGTACGT\n+\nIIIIIIII\n@r3_51_4_extra\nACGT\n+\nIIII\n";

fn write_tmp(data: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

fn check(samples: StitchSamples) {
    assert_eq!(samples.overlaps(), &[45, 38, 51]);
    assert_eq!(samples.mismatches(), &[2, 0, 4]);
    assert_eq!(samples.lines_read(), 12);
}

#[test]
fn can_read_plain_files() {
    let file = write_tmp(FASTQ);
    check(StitchSamples::from_path(file.path()).unwrap());
}

#[cfg(feature = "compression")]
#[test]
fn can_read_compressed_files_automatically() {
    let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    gz.write_all(FASTQ).unwrap();
    let mut bz = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    bz.write_all(FASTQ).unwrap();
    let mut xz = xz2::write::XzEncoder::new(Vec::new(), 6);
    xz.write_all(FASTQ).unwrap();

    for data in &[gz.finish().unwrap(), bz.finish().unwrap(), xz.finish().unwrap()] {
        let file = write_tmp(data);
        check(StitchSamples::from_path(file.path()).unwrap());
    }
}

#[cfg(feature = "compression")]
#[test]
fn can_read_concatenated_gzip_members() {
    let mut data = Vec::new();
    for chunk in FASTQ.split_inclusive(|&b| b == b'\n').collect::<Vec<_>>().chunks(4) {
        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        for line in chunk {
            gz.write_all(line).unwrap();
        }
        data.extend(gz.finish().unwrap());
    }
    let file = write_tmp(&data);
    check(StitchSamples::from_path(file.path()).unwrap());
}

#[cfg(feature = "compression")]
#[test]
fn truncated_gzip_is_an_error() {
    let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    gz.write_all(FASTQ).unwrap();
    let data = gz.finish().unwrap();
    let file = write_tmp(&data[..data.len() / 2]);
    assert!(StitchSamples::from_path(file.path()).is_err());
}
