use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const HEADER_LEN: u64 = 256 + 8;

fn seqpak() -> Command {
    Command::cargo_bin("seqpak").unwrap()
}

#[test]
fn test_cli_build_list_unpack_cycle() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Setup: fixture tree, built from inside the workdir so every input
    // path is relative.
    let workdir = tempdir()?;
    fs::write(workdir.path().join("a.txt"), "hey")?;
    fs::create_dir(workdir.path().join("dir"))?;
    fs::write(workdir.path().join("dir/b.txt"), "")?;

    // 2. Build: suffix convention appends .spk to the bare target name.
    seqpak()
        .current_dir(workdir.path())
        .args(["build", "stuff", "a.txt", "dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stuff.spk"));

    // The worked example: two headers, three payload bytes, nothing else.
    let archive = workdir.path().join("stuff.spk");
    assert_eq!(fs::metadata(&archive)?.len(), 2 * HEADER_LEN + 3);

    // 3. List: names in traversal order, payloads untouched.
    seqpak()
        .current_dir(workdir.path())
        .args(["list", "stuff.spk"])
        .assert()
        .success()
        .stdout(predicate::str::diff("a.txt\ndir/b.txt\n"));

    // 4. Unpack under a prefix.
    seqpak()
        .current_dir(workdir.path())
        .args(["unpack", "stuff.spk", "out"])
        .assert()
        .success();

    assert_eq!(fs::read(workdir.path().join("out/a.txt"))?, b"hey");
    assert_eq!(fs::read(workdir.path().join("out/dir/b.txt"))?, b"");

    Ok(())
}

#[test]
fn test_cli_build_keeps_explicit_suffix() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;
    fs::write(workdir.path().join("a.txt"), "hey")?;

    seqpak()
        .current_dir(workdir.path())
        .args(["build", "named.spk", "a.txt"])
        .assert()
        .success();

    assert!(workdir.path().join("named.spk").exists());
    assert!(!workdir.path().join("named.spk.spk").exists());
    Ok(())
}

#[test]
fn test_cli_build_refuses_overwrite() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;
    fs::write(workdir.path().join("a.txt"), "hey")?;
    fs::write(workdir.path().join("stuff.spk"), "occupied")?;

    seqpak()
        .current_dir(workdir.path())
        .args(["build", "stuff.spk", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));

    assert_eq!(fs::read(workdir.path().join("stuff.spk"))?, b"occupied");
    Ok(())
}

#[test]
fn test_cli_build_rejects_absolute_path() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;

    seqpak()
        .current_dir(workdir.path())
        .args(["build", "stuff", "/etc/passwd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absolute paths are not allowed"));

    // The aborted build leaves no partial archive behind.
    assert!(!workdir.path().join("stuff.spk").exists());
    Ok(())
}

#[test]
fn test_cli_build_rejects_overlong_name() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;
    // Five 60-byte directories push the relative path past 255 bytes.
    let mut deep = workdir.path().to_path_buf();
    for _ in 0..5 {
        deep = deep.join("d".repeat(60));
    }
    fs::create_dir_all(&deep)?;
    fs::write(deep.join("leaf.txt"), "unreachable")?;

    let root = "d".repeat(60);
    seqpak()
        .current_dir(workdir.path())
        .args(["build", "stuff", root.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds 255 bytes"));

    assert!(!workdir.path().join("stuff.spk").exists());
    Ok(())
}

#[test]
fn test_cli_build_compress_drops_intermediate() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;
    fs::write(workdir.path().join("a.txt"), "compress me")?;

    seqpak()
        .current_dir(workdir.path())
        .args(["build-compress", "stuff", "a.txt"])
        .assert()
        .success();

    assert!(workdir.path().join("stuff.spk.zst").exists());
    assert!(!workdir.path().join("stuff.spk").exists());
    Ok(())
}

#[test]
fn test_cli_unpack_decompress_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;
    fs::write(workdir.path().join("a.txt"), "round and round")?;
    fs::create_dir(workdir.path().join("dir"))?;
    fs::write(workdir.path().join("dir/b.bin"), [7u8, 8, 9])?;

    seqpak()
        .current_dir(workdir.path())
        .args(["build-compress", "stuff", "a.txt", "dir"])
        .assert()
        .success();

    seqpak()
        .current_dir(workdir.path())
        .args(["unpack-decompress", "stuff.spk.zst", "restored"])
        .assert()
        .success();

    assert_eq!(
        fs::read(workdir.path().join("restored/a.txt"))?,
        b"round and round"
    );
    assert_eq!(fs::read(workdir.path().join("restored/dir/b.bin"))?, [7u8, 8, 9]);
    // The intermediate plain archive is cleaned up; the compressed one stays.
    assert!(!workdir.path().join("stuff.spk").exists());
    assert!(workdir.path().join("stuff.spk.zst").exists());
    Ok(())
}

#[test]
fn test_cli_compress_decompress_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;
    fs::write(workdir.path().join("a.txt"), "hey")?;

    seqpak()
        .current_dir(workdir.path())
        .args(["build", "stuff", "a.txt"])
        .assert()
        .success();
    let original = fs::read(workdir.path().join("stuff.spk"))?;

    seqpak()
        .current_dir(workdir.path())
        .args(["compress", "stuff.spk"])
        .assert()
        .success();

    fs::remove_file(workdir.path().join("stuff.spk"))?;

    seqpak()
        .current_dir(workdir.path())
        .args(["decompress", "stuff.spk.zst"])
        .assert()
        .success();

    assert_eq!(fs::read(workdir.path().join("stuff.spk"))?, original);
    Ok(())
}

#[test]
fn test_cli_list_corrupt_archive_fails() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;
    fs::write(workdir.path().join("mangled.spk"), vec![b'x'; 100])?;

    seqpak()
        .current_dir(workdir.path())
        .args(["list", "mangled.spk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt archive"));
    Ok(())
}

#[test]
fn test_cli_short_aliases() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempdir()?;
    fs::write(workdir.path().join("a.txt"), "hey")?;

    seqpak()
        .current_dir(workdir.path())
        .args(["b", "stuff", "a.txt"])
        .assert()
        .success();

    seqpak()
        .current_dir(workdir.path())
        .args(["l", "stuff.spk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));

    seqpak()
        .current_dir(workdir.path())
        .args(["u", "stuff.spk", "out"])
        .assert()
        .success();

    assert_eq!(fs::read(workdir.path().join("out/a.txt"))?, b"hey");
    Ok(())
}
