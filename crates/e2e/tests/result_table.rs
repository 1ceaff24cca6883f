//! Integration tests for the case sheet round trip: load, record,
//! flush, reload, including the `_temp` sibling fallback.

use civiport_e2e::data::{temp_sibling, STATUS_FAILED, STATUS_PASSED};
use civiport_e2e::{ResultTable, TestData};

const SHEET: &str = "\
TC ID,Test Data,Expected Result,Status,Remarks
AUTH01,Email: admin@email.com Password: password,User lands on the dashboard,,
FPASS09,\"Email: ramala@example.com, masked_email: r****@e****.com\",Masked email shown on OTP tab,,
GOV04,\"email: gov@example.com, password: pw, RolesAssignments: Chief Minister|Rajendra Bhosale; Home Minister|Milind Sabnis\",Roles mapped,,
";

#[test]
fn statuses_survive_a_full_write_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("testdata.csv");
    std::fs::write(&path, SHEET).unwrap();

    let mut table = ResultTable::load(&path).unwrap();
    assert_eq!(table.records().len(), 3);

    table.record("AUTH01", STATUS_PASSED, "User lands on the dashboard");
    table.record(
        "FPASS09",
        STATUS_FAILED,
        "Masked email shown on OTP tab | Actual: banner not visible",
    );
    let written = table.flush().unwrap();
    assert_eq!(written, path);

    let reloaded = ResultTable::load(&path).unwrap();
    assert_eq!(reloaded.find("AUTH01").unwrap().status, STATUS_PASSED);
    assert_eq!(reloaded.find("FPASS09").unwrap().status, STATUS_FAILED);
    // Untouched rows keep their blank status.
    assert_eq!(reloaded.find("GOV04").unwrap().status, "");
}

#[test]
fn test_data_cells_parse_through_the_same_path_the_runner_uses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("testdata.csv");
    std::fs::write(&path, SHEET).unwrap();

    let table = ResultTable::load(&path).unwrap();
    let gov = TestData::parse(&table.find("GOV04").unwrap().test_data);
    assert_eq!(gov.get("email"), "gov@example.com");
    assert!(gov.get("rolesassignments").contains("Chief Minister|Rajendra Bhosale"));

    let fpass = TestData::parse(&table.find("FPASS09").unwrap().test_data);
    assert_eq!(fpass.get("masked_email"), "r****@e****.com");
}

#[test]
fn blocked_sheet_falls_back_to_the_temp_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("testdata.csv");
    std::fs::write(&path, SHEET).unwrap();

    let mut table = ResultTable::load(&path).unwrap();
    table.record("AUTH01", STATUS_PASSED, "User lands on the dashboard");

    // Simulate the sheet being held open: make the path unopenable.
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let written = table.flush().unwrap();
    assert_eq!(written, temp_sibling(&path));
    assert_eq!(written, dir.path().join("testdata_temp.csv"));

    let reloaded = ResultTable::load(&written).unwrap();
    assert_eq!(reloaded.find("AUTH01").unwrap().status, STATUS_PASSED);
}
