
use fixtures::*;

use assert_cmd::prelude::*;
use blkfmt::ActionFlags;
use byteorder::LittleEndian;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn sample_trace() -> Vec<u8> {
    let mut data = encode_record::<LittleEndian>(1, action_word(1, ActionFlags::READ), &[]);
    data.extend(encode_record::<LittleEndian>(
        2,
        action_word(8, ActionFlags::READ),
        &[],
    ));
    data.extend(encode_record::<LittleEndian>(
        3,
        action_word(13, ActionFlags::READ),
        &4100_u64.to_be_bytes(),
    ));
    data
}

fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("sample.trace");
    File::create(&path)
        .unwrap()
        .write_all(&sample_trace())
        .unwrap();
    path
}

#[test]
fn it_renders_default_layout() {
    let d = tempdir().unwrap();
    let sample = write_sample(d.path());

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.arg(&sample);

    cmd.assert().success().stdout(concat!(
        "259,1    1        1     2.000000500   777  Q   R 4096 + 16 [git]\n",
        "259,1    1        2     2.000000500   777  C   R 4096 + 16 [0]\n",
        "259,1    1        3     2.000000500   777  X   R 4096 / 4100 [git]\n",
    ));
}

#[test]
fn it_applies_format_overrides() {
    let d = tempdir().unwrap();
    let sample = write_sample(d.path());

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.args(["-F", "C,done %S err=%e\\n", "-f", "%a %p %C\\n"]);
    cmd.arg(&sample);

    cmd.assert()
        .success()
        .stdout("Q 777 git\ndone 4096 err=0\nX 777 git\n");
}

#[test]
fn it_reads_stdin_with_dash() {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.args(["-f", "%s\\n", "-"]);
    cmd.write_stdin(sample_trace());

    cmd.assert().success().stdout("1\n2\n3\n");
}

#[test]
fn it_rejects_invalid_format_spec() {
    let d = tempdir().unwrap();
    let sample = write_sample(d.path());

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.args(["-F", "Z,%p"]);
    cmd.arg(&sample);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bad format specifier `Z`"));
}

#[test]
fn it_fails_on_invalid_escape() {
    let d = tempdir().unwrap();
    let sample = write_sample(d.path());

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.args(["-f", "%p\\q"]);
    cmd.arg(&sample);

    cmd.assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("invalid escape char"));
}

#[test]
fn it_fails_when_elapsed_is_requested() {
    let d = tempdir().unwrap();
    let sample = write_sample(d.path());

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.args(["-F", "C,%u\\n"]);
    cmd.arg(&sample);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("expecting elapsed value"));
}

#[test]
fn it_fails_on_corrupt_trace() {
    let d = tempdir().unwrap();
    let path = d.path().join("corrupt.trace");
    fs::write(&path, [0_u8; 64]).unwrap();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.arg(&path);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid trace record magic"));
}

#[test]
fn it_respects_output_file() {
    let d = tempdir().unwrap();
    let sample = write_sample(d.path());
    let f = d.path().join("nested").join("out.txt");

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.args(["-f", "%S\\n", "-o", &f.to_string_lossy()]);
    cmd.arg(&sample);

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    assert!(
        output.stdout.is_empty(),
        "Expected output to be printed to file, but was printed to stdout"
    );
    assert_eq!(fs::read_to_string(&f).unwrap(), "4096\n4096\n4096\n");
}

#[test]
fn test_it_refuses_to_overwrite_directory() {
    let d = tempdir().unwrap();
    let sample = write_sample(d.path());

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.args(["-o", &d.path().to_string_lossy()]);
    cmd.arg(&sample);

    cmd.assert().failure().code(1);
}

#[test]
fn test_it_overwrites_file_anyways_if_passed_flag() {
    let d = tempdir().unwrap();
    let sample = write_sample(d.path());
    let f = d.path().join("test.out");
    fs::write(&f, b"I'm a file!").unwrap();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("blkfmt"));
    cmd.args([
        "-f",
        "%p\\n",
        "-o",
        &f.to_string_lossy(),
        "--no-confirm-overwrite",
    ]);
    cmd.arg(&sample);

    cmd.assert().success();
    assert_eq!(fs::read_to_string(&f).unwrap(), "777\n777\n777\n");
}
