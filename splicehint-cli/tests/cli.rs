use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

const TOY_MATRIX: &str = "\
# toy matrix for tests
a, m, k, f, t, g, s, *
a,  4, -1, -1, -1,  0,  0,  1, -2
m, -1,  6,  2,  0, -1, -2, -1, -2
k, -1,  2,  5,  0,  0, -2,  0, -2
f, -1,  0,  0,  6, -1, -2, -2, -2
t,  0, -1,  0, -1,  5, -2,  1, -2
g,  0, -2, -2, -2, -2,  6,  0, -2
s,  1, -1,  0, -2,  1,  0,  4, -2
*, -2, -2, -2, -2, -2, -2, -2,  1
";

/// One alignment block with a start codon, a gt..ag intron and a stop codon.
fn two_exon_block(header: &str) -> String {
    format!(
        "{header}\nALIGNMENT\n\n{:<9} M  K         F  * ;\n{:>9}ATGAAGgtcccagTTTTAA;\n{:>9} M  K         F  - ;\n",
        "", 100, 1
    )
}

const EXPECTED_HINTS: &str = "\
g1\tsplicehint\tIntron\t106\t112\t.\t+\t.\tprot=p1; intron_id=1; splice_sites=gt_ag; al_score=0.552771; LeScore=11; ReScore=4;
g1\tsplicehint\tstart_codon\t100\t102\t.\t+\t.\tprot=p1; al_score=0.416667; eScore=11;
g1\tsplicehint\tstop_codon\t116\t118\t.\t+\t.\tprot=p1; al_score=0.5; eScore=4;
g1\tsplicehint\tCDS\t100\t105\t.\t+\t.\tprot=p1; exon_id=1; eScore=11;
g1\tsplicehint\tCDS\t113\t118\t.\t+\t.\tprot=p1; exon_id=2; eScore=4;
";

fn write_inputs(dir: &Path) -> (String, String) {
    let ali = dir.join("alignments.ali");
    let matrix = dir.join("matrix.csv");
    fs::write(&ali, two_exon_block(">g1 >p1")).unwrap();
    fs::write(&matrix, TOY_MATRIX).unwrap();
    (
        ali.to_str().unwrap().to_string(),
        matrix.to_str().unwrap().to_string(),
    )
}

#[test]
fn produces_hint_records_from_file() {
    let dir = TempDir::new().unwrap();
    let (ali, matrix) = write_inputs(dir.path());
    let output = dir.path().join("hints.gff");

    Command::cargo_bin("splicehint")
        .unwrap()
        .args(["-i", &ali, "-s", &matrix, "-w", "2", "-k", "box", "-e", "0"])
        .args(["-o", output.to_str().unwrap(), "-q"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, EXPECTED_HINTS);
}

#[test]
fn reads_alignments_from_stdin() {
    let dir = TempDir::new().unwrap();
    let (_, matrix) = write_inputs(dir.path());
    let output = dir.path().join("hints.gff");

    Command::cargo_bin("splicehint")
        .unwrap()
        .args(["-s", &matrix, "-w", "2", "-k", "box", "-e", "0"])
        .args(["-o", output.to_str().unwrap(), "-q"])
        .write_stdin(two_exon_block(">g1 >p1"))
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, EXPECTED_HINTS);
}

#[test]
fn default_exon_threshold_filters_weak_features() {
    let dir = TempDir::new().unwrap();
    let (ali, matrix) = write_inputs(dir.path());
    let output = dir.path().join("hints.gff");

    // Both exons score below the default threshold of 25
    Command::cargo_bin("splicehint")
        .unwrap()
        .args(["-i", &ali, "-s", &matrix, "-w", "2", "-k", "box"])
        .args(["-o", output.to_str().unwrap(), "-q"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.is_empty());
}

#[test]
fn no_reverse_flag_drops_reverse_alignments() {
    let dir = TempDir::new().unwrap();
    let (_, matrix) = write_inputs(dir.path());
    let ali = dir.path().join("reverse.ali");
    fs::write(&ali, two_exon_block(">g1 >p1 (reverse)")).unwrap();
    let output = dir.path().join("hints.gff");

    Command::cargo_bin("splicehint")
        .unwrap()
        .args(["-i", ali.to_str().unwrap(), "-s", &matrix, "-e", "0"])
        .args(["-o", output.to_str().unwrap(), "--no-reverse", "-q"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.is_empty());
}

#[test]
fn missing_matrix_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let (ali, _) = write_inputs(dir.path());
    let output = dir.path().join("hints.gff");

    Command::cargo_bin("splicehint")
        .unwrap()
        .args(["-i", &ali, "-s", "no/such/matrix.csv"])
        .args(["-o", output.to_str().unwrap(), "-q"])
        .assert()
        .failure();
}

#[test]
fn invalid_kernel_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (ali, matrix) = write_inputs(dir.path());
    let output = dir.path().join("hints.gff");

    Command::cargo_bin("splicehint")
        .unwrap()
        .args(["-i", &ali, "-s", &matrix, "-k", "gaussian"])
        .args(["-o", output.to_str().unwrap(), "-q"])
        .assert()
        .failure();
}

#[test]
fn malformed_block_is_skipped_with_warning() {
    let dir = TempDir::new().unwrap();
    let (_, matrix) = write_inputs(dir.path());
    let ali = dir.path().join("mixed.ali");
    let mut content = String::from(">broken\njunk\n");
    content.push_str(&two_exon_block(">g1 >p1"));
    fs::write(&ali, content).unwrap();
    let output = dir.path().join("hints.gff");

    Command::cargo_bin("splicehint")
        .unwrap()
        .args(["-i", ali.to_str().unwrap(), "-s", &matrix, "-w", "2"])
        .args(["-k", "box", "-e", "0", "-o", output.to_str().unwrap()])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, EXPECTED_HINTS);
}
