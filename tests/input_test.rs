mod common;
use common::*;

#[test]
fn test_read_integer() {
    let r = exec_with_input(
        &listing(&[
            "INC 0 1", "RDI 0 0", "LDV 0 0", "LCI 0 1", "OPR 0 3", "OPR 0 20", "JMP 0 0",
        ]),
        "41\n",
    );
    assert_eq!(r.output, "42");
    assert_eq!(r.status, 0);
}

#[test]
fn test_read_real() {
    let r = exec_with_input(
        &listing(&[
            "INC 0 1", "RDR 0 0", "LDV 0 0", "LCR 0 2", "OPR 0 5", "OPR 0 20", "JMP 0 0",
        ]),
        "2.5\r\n",
    );
    assert_eq!(r.output, "5.0");
}

#[test]
fn test_sum_until_end_of_input() {
    let r = exec_with_input(
        &listing(&[
            "INC 0 1",
            "INC 0 1",
            "LCI 0 0",
            "STO 0 0",
            "OPR 0 19",
            "OPR 0 16",
            "JIF 0 15",
            "RDI 0 1",
            "LDV 0 0",
            "LDV 0 1",
            "OPR 0 3",
            "STO 0 0",
            "JMP 0 5",
            "JMP 0 0",
            "LDV 0 0",
            "OPR 0 20",
            "JMP 0 0",
        ]),
        "1\n2\n3\n",
    );
    assert_eq!(r.output, "6");
    assert_eq!(r.status, 0);
}

#[test]
fn test_end_of_input_raises_exception_4() {
    let r = exec_with_input(
        &listing(&[
            "INC 0 1",
            "REH 0 5",
            "RDI 0 0",
            "JMP 0 0",
            "LCI 0 4",
            "OPR 0 31",
            "JIF 0 10",
            "LCS 0 'eof'",
            "OPR 0 20",
            "JMP 0 0",
        ]),
        "",
    );
    assert_eq!(r.output, "eof");
    assert_eq!(r.status, 0);
}

#[test]
fn test_malformed_input_raises_exception_3() {
    let r = exec_with_input(
        &listing(&[
            "INC 0 1",
            "REH 0 5",
            "RDI 0 0",
            "JMP 0 0",
            "LCI 0 3",
            "OPR 0 31",
            "JIF 0 10",
            "LCS 0 'mismatch'",
            "OPR 0 20",
            "JMP 0 0",
        ]),
        "abc\n",
    );
    assert_eq!(r.output, "mismatch");
}

#[test]
fn test_malformed_input_unhandled() {
    let r = exec_with_input(&listing(&["INC 0 1", "RDR 0 0", "JMP 0 0"]), "1.2.3\n");
    assert_eq!(r.status, 1);
    assert!(r.report.contains("CODE:2:Exception #3 never handled!"));
}

#[test]
fn test_read_keeps_slot_on_eof() {
    let r = exec_with_input(&listing(&["INC 0 1", "RDI 0 0", "JMP 0 0"]), "");
    assert_eq!(r.status, 1);
    assert!(r.report.contains("Exception #4 never handled!"));
    assert!(r.report.ends_with("----------\nUNDEF\n0\n0\n0\n0\n"));
}
