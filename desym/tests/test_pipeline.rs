mod common;

use std::fs;

use common::{fake_developer_dir, fake_dsym, report, StubRunner, Workspace};
use desym::{desymbolicate, Config, DesymError};

#[test]
fn test_offset_frame_rewritten_with_backup() {
    let original = report(
        "0   libsystem_kernel.dylib        0x00000001842fb014 0x1842fa000 + 4116   \n\
         2   MyApp   0x00000001003dc6d8 0x100000000 + 42350",
    );
    let ws = Workspace::new(&original);
    let runner = StubRunner::with_atos_output("funcName (in MyApp) + 10\n");

    let outcome = desymbolicate(&Config::new(&ws.report, &ws.binary), &runner).unwrap();

    assert_eq!(outcome.resolved_frames, 1);
    assert!(!outcome.pre_resolved);
    assert_eq!(outcome.backup.as_deref(), Some(ws.backup().as_path()));

    let rewritten = ws.read_report();
    let lines: Vec<&str> = rewritten.lines().collect();
    assert!(lines.contains(&"2   MyApp   0x00000001003dc6d8 funcName (in MyApp) + 10"));
    // Other frames only lose trailing whitespace
    assert!(
        lines.contains(&"0   libsystem_kernel.dylib        0x00000001842fb014 0x1842fa000 + 4116")
    );
    assert_eq!(lines.len(), original.lines().count());

    assert_eq!(fs::read_to_string(ws.backup()).unwrap(), original);

    let atos = runner.calls("atos");
    assert_eq!(atos.len(), 1);
    assert!(atos[0].to_string().ends_with("-l 0x100000000 -arch arm64 0x1003dc6d8"));
}

#[test]
fn test_count_mismatch_leaves_report_untouched() {
    let original = report(
        "2   MyApp   0x00000001003dc6d8 0x100000000 + 42350\n\
         3   MyApp   0x0000000100001000 0x100000000 + 4096",
    );
    let ws = Workspace::new(&original);
    let runner = StubRunner::with_atos_output("only_one (in MyApp)\n");

    let err = desymbolicate(&Config::new(&ws.report, &ws.binary), &runner).unwrap_err();

    assert!(matches!(err, DesymError::CountMismatch { expected: 2, found: 1 }));
    assert_eq!(ws.read_report(), original);
    assert!(!ws.backup().exists());
}

#[test]
fn test_mixed_load_addresses_abort() {
    let original = report(
        "2   MyApp   0x00000001003dc6d8 0x100000000 + 42350\n\
         3   MyApp   0x0000000104001000 0x104000000 + 4096",
    );
    let ws = Workspace::new(&original);
    let runner = StubRunner::default();

    let err = desymbolicate(&Config::new(&ws.report, &ws.binary), &runner).unwrap_err();

    assert!(matches!(err, DesymError::LoadAddressMismatch { .. }));
    assert!(runner.calls("atos").is_empty());
    assert_eq!(ws.read_report(), original);
    assert!(!ws.backup().exists());
}

#[test]
fn test_second_run_is_a_no_op() {
    let ws = Workspace::new(&report(
        "1   MyApp   0x00000001003dc6d8 0x100000000 + 42350\n\
         2   MyApp   0x0000000100002000 MyApp + 8192\n\
         3   MyApp   0x0000000100003000",
    ));
    let config = Config::new(&ws.report, &ws.binary);

    let first = desymbolicate(&config, &StubRunner::default()).unwrap();
    assert_eq!(first.resolved_frames, 3);
    let after_first = ws.read_report();
    let backup = fs::read_to_string(ws.backup()).unwrap();

    let runner = StubRunner::default();
    let second = desymbolicate(&config, &runner).unwrap();

    assert_eq!(second.resolved_frames, 0);
    assert!(second.backup.is_none());
    assert!(runner.calls.borrow().is_empty());
    assert_eq!(ws.read_report(), after_first);
    // The backup of the raw report survives
    assert_eq!(fs::read_to_string(ws.backup()).unwrap(), backup);
}

#[test]
fn test_decimal_frames_resolved_with_slide() {
    let ws = Workspace::new(&report(
        "1   MyApp   0x00000001003dc6d8 0x100000000 + 4048600\n\
         2   MyApp   0x0000000100002000 MyApp + 8192",
    ));
    let runner = StubRunner::default();

    desymbolicate(&Config::new(&ws.report, &ws.binary), &runner).unwrap();

    assert_eq!(runner.calls("otool").len(), 1);
    let rewritten = ws.read_report();
    assert!(rewritten.contains("1   MyApp   0x00000001003dc6d8 fn_0x3dd6d8 (in MyApp)\n"));
    assert!(rewritten.contains("2   MyApp   0x0000000100002000 fn_0x3000 (in MyApp)\n"));
}

#[test]
fn test_duplicate_frames_resolved_once() {
    let ws = Workspace::new(&report(
        "1   MyApp   0x0000000100001000 0x100000000 + 4096\n\
         1   MyApp   0x0000000100001000 0x100000000 + 4096",
    ));
    let runner = StubRunner::default();

    let outcome = desymbolicate(&Config::new(&ws.report, &ws.binary), &runner).unwrap();

    assert_eq!(outcome.resolved_frames, 1);
    assert!(runner.calls("atos")[0].to_string().ends_with("-arch arm64 0x100001000"));
    assert_eq!(ws.read_report().matches("fn_0x100001000 (in MyApp)").count(), 2);
}

#[test]
fn test_missing_binary_images_is_fatal() {
    let original = "Thread 0 Crashed:\n2   MyApp   0x00000001003dc6d8 0x100000000 + 42350\n";
    let ws = Workspace::new(original);

    let err =
        desymbolicate(&Config::new(&ws.report, &ws.binary), &StubRunner::default()).unwrap_err();

    assert!(matches!(err, DesymError::BinaryImageNotFound));
    assert_eq!(ws.read_report(), original);
}

#[test]
fn test_missing_inputs() {
    let ws = Workspace::new(&report(""));
    let runner = StubRunner::default();

    let err = desymbolicate(&Config::new(ws.root.join("nope.crash"), &ws.binary), &runner)
        .unwrap_err();
    assert!(err.is_input_error());

    let err = desymbolicate(&Config::new(&ws.report, ws.root.join("nope.dSYM")), &runner)
        .unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn test_symbolicatecrash_output_feeds_atos() {
    let ws = Workspace::new(&report(
        "0   libsystem_kernel.dylib        0x00000001842fb014 0x1842fa000 + 4116\n\
         1   MyApp   0x0000000100001000 0x100000000 + 4096",
    ));
    let dsym = fake_dsym(&ws.root);
    let (developer, _) = fake_developer_dir(&ws.root, "#!/bin/sh\n");
    let symbolicated = report(
        "0   libsystem_kernel.dylib        0x00000001842fb014 mach_msg_trap + 8\n\
         1   MyApp   0x0000000100001000 0x100000000 + 4096",
    );
    let runner = StubRunner { symbolicated: Some(symbolicated), ..StubRunner::default() };
    let config = Config::new(&ws.report, &dsym).with_developer_dir(Some(developer));

    let outcome = desymbolicate(&config, &runner).unwrap();

    assert!(outcome.pre_resolved);
    assert_eq!(outcome.resolved_frames, 1);
    let rewritten = ws.read_report();
    assert!(
        rewritten.contains("0   libsystem_kernel.dylib        0x00000001842fb014 mach_msg_trap + 8\n")
    );
    assert!(rewritten.contains("1   MyApp   0x0000000100001000 fn_0x100001000 (in MyApp)\n"));

    // atos reads the DWARF object inside the bundle
    let atos = runner.calls("atos");
    let object = dsym.join("Contents/Resources/DWARF/MyApp").canonicalize().unwrap();
    assert!(atos[0].args.contains(&object.into_os_string()));
}

#[test]
fn test_symbolicatecrash_failure_falls_back_to_atos() {
    let original = report("1   MyApp   0x0000000100001000 0x100000000 + 4096");
    let ws = Workspace::new(&original);
    let dsym = fake_dsym(&ws.root);
    // No developer dir configured and xcode-select is missing
    let runner = StubRunner::default();

    let outcome = desymbolicate(&Config::new(&ws.report, &dsym), &runner).unwrap();

    assert!(!outcome.pre_resolved);
    assert_eq!(runner.calls("xcode-select").len(), 1);
    assert!(runner.calls("symbolicatecrash").is_empty());
    assert!(ws.read_report().contains("fn_0x100001000 (in MyApp)"));
}

#[test]
fn test_non_utf8_report_left_byte_for_byte() {
    let ws = Workspace::new("");
    let mut original = b"Device Name: Caf\xe9 iPhone\n".to_vec();
    let text = report("1   MyApp   0x0000000100001000 0x100000000 + 4096");
    original.extend_from_slice(text.as_bytes());
    fs::write(&ws.report, &original).unwrap();
    let runner = StubRunner::default();

    let err = desymbolicate(&Config::new(&ws.report, &ws.binary), &runner).unwrap_err();

    assert!(matches!(err, DesymError::NotUtf8 { .. }));
    assert!(runner.calls.borrow().is_empty());
    assert_eq!(fs::read(&ws.report).unwrap(), original);
    assert!(!ws.backup().exists());
}
