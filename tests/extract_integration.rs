//! End-to-end extraction tests
//!
//! Decodes on-disk plain and gzip variant files through the library and
//! through the `ibs-extract` binary.

use flate2::write::GzEncoder;
use flate2::Compression;
use ibs_extract::core::{ConfigError, DecoderConfig, ExtractError, PathInputSet, RecordEmitter};
use ibs_extract::formats::{write_tsv, ExtractStats};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

fn manifest_text() -> String {
    let mut text = String::from("chr1.merge.mat.tsv.gz 2\nchr2.merge.mat.tsv.gz 3\n");
    for n in 3..=22 {
        text.push_str(&format!("chr{}.merge.mat.tsv.gz 0\n", n));
    }
    text
}

fn gzip(data: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// chr1 plain, chr2 gzip-compressed under an .af name, plus a stray file
fn fixture(chr1: &str, chr2: &str) -> (TempDir, Vec<PathBuf>) {
    let dir = tempdir().unwrap();

    let chr1_path = dir.path().join("chr1.merge.mat.af");
    std::fs::write(&chr1_path, chr1).unwrap();

    let chr2_path = dir.path().join("chr2.merge.mat.af");
    std::fs::write(&chr2_path, gzip(chr2)).unwrap();

    let stray = dir.path().join("chr1.merge.mat.tsv.gz");
    std::fs::write(&stray, "not decoded").unwrap();

    (dir, vec![chr1_path, stray, chr2_path])
}

fn config(mode: &str) -> DecoderConfig {
    let mut attrs = HashMap::new();
    attrs.insert("line.count".to_string(), manifest_text());
    attrs.insert("mode".to_string(), mode.to_string());
    DecoderConfig::from_attributes(&attrs).unwrap()
}

fn triples(paths: &[PathBuf], config: DecoderConfig) -> Vec<(i64, i64, f64)> {
    RecordEmitter::new(PathInputSet::new(paths.to_vec()), config)
        .map(|r| r.map(|row| (row.sample_idx, row.pos_idx, row.value)))
        .collect::<Result<_, _>>()
        .unwrap()
}

const RAW_CHR1: &str = "x\ty\tA\tT\t0\tN\t1\nx\ty\tG\tg\t1\t1\t1\n";
const RAW_CHR2: &str = "x\ty\tC\tG\t1\t0.5\tN\n";
const COV_CHR1: &str = "x\ty\tA\tT\tA\tN\tT\nx\ty\tG\tg\tG\n";
const COV_CHR2: &str = "x\ty\tC\tG\tC\tG\tG\n";

#[test]
fn test_raw_extraction_from_disk() {
    let (_dir, paths) = fixture(RAW_CHR1, RAW_CHR2);
    assert_eq!(
        triples(&paths, config("raw")),
        vec![(0, 0, 0.0), (2, 0, 1.0), (0, 2, 1.0), (1, 2, 0.5)]
    );
}

#[test]
fn test_coverage_extraction_from_disk() {
    let (_dir, paths) = fixture(COV_CHR1, COV_CHR2);
    assert_eq!(
        triples(&paths, config("COV")),
        vec![
            (0, 0, 0.0),
            (2, 0, 1.0),
            (-1, 0, 0.5),
            (0, 2, 0.0),
            (1, 2, 1.0),
            (2, 2, 1.0),
            (-1, 2, 2.0 / 3.0),
        ]
    );
}

#[test]
fn test_file_without_chromosome_label() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("merged.af");
    std::fs::write(&path, RAW_CHR1).unwrap();

    let mut emitter = RecordEmitter::new(PathInputSet::new([path]), config("raw"));
    let err = emitter.next_row().unwrap_err();
    assert!(matches!(err, ExtractError::Config(ConfigError::MissingChromLabel(_))));
}

#[test]
fn test_write_tsv_from_disk() {
    let (_dir, paths) = fixture(RAW_CHR1, RAW_CHR2);
    let mut emitter = RecordEmitter::new(PathInputSet::new(paths), config("raw"));

    let mut out = Vec::new();
    let stats = write_tsv(&mut emitter, &mut out).unwrap();
    assert_eq!(stats, ExtractStats { total: 4, samples: 4, aggregates: 0 });
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "sample_idx\tpos_idx\tval\n0\t0\t0\n2\t0\t1\n0\t2\t1\n1\t2\t0.5\n"
    );
}

// ============================================================================
// CLI Tests
// ============================================================================

fn ibs_extract() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ibs-extract"))
}

fn run(cmd: &mut Command) {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_matrices(dir: &Path) -> Vec<PathBuf> {
    (1..=22)
        .map(|n| {
            let path = dir.join(format!("chr{}.merge.mat.tsv.gz", n));
            let rows: String = (0..(n % 3)).map(|i| format!("rs{}\t{}\tA\tT\t0\t1\n", i, i)).collect();
            std::fs::write(&path, gzip(&rows)).unwrap();
            path
        })
        .collect()
}

#[test]
fn test_cli_decode_directory() {
    let (input_dir, _paths) = fixture(COV_CHR1, COV_CHR2);
    std::fs::write(input_dir.path().join("line.count.txt"), manifest_text()).unwrap();

    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("rows.tsv");

    run(ibs_extract()
        .arg("decode")
        .arg("--line-count")
        .arg(input_dir.path().join("line.count.txt"))
        .args(["--mode", "cov", "-o"])
        .arg(&output)
        .arg(input_dir.path()));

    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "sample_idx\tpos_idx\tval");
    assert_eq!(lines[1..4], ["0\t0\t0", "2\t0\t1", "-1\t0\t0.5"]);
    assert_eq!(lines.len(), 8);
    assert!(lines[7].starts_with("-1\t2\t0.666"));
}

#[test]
fn test_cli_count_then_decode() {
    let matrix_dir = tempdir().unwrap();
    let matrices = write_matrices(matrix_dir.path());

    let work = tempdir().unwrap();
    let manifest = work.path().join("line.count");
    run(ibs_extract()
        .args(["count", "-t", "2", "-o"])
        .arg(&manifest)
        .args(&matrices));

    let text = std::fs::read_to_string(&manifest).unwrap();
    let first: Vec<&str> = text.lines().take(3).collect();
    assert_eq!(
        first,
        ["chr1.merge.mat.tsv.gz 1", "chr2.merge.mat.tsv.gz 2", "chr3.merge.mat.tsv.gz 0"]
    );

    // chr4 starts after chr1..chr3: 1 + 2 + 0
    let chr4 = work.path().join("chr4.merge.af");
    std::fs::write(&chr4, "x\ty\tA\tT\t7\n").unwrap();
    let output = work.path().join("rows.tsv");
    run(ibs_extract()
        .arg("decode")
        .arg("--line-count")
        .arg(&manifest)
        .arg("-o")
        .arg(&output)
        .arg(&chr4));

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "sample_idx\tpos_idx\tval\n0\t3\t7\n"
    );
}
