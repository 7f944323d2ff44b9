use rstest::rstest;
use slider_config::load_trace_csv;
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_rows_with_and_without_hand() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    fs::write(
        &path,
        "x1,y1,x2,y2\n100,200,130,240\n,,,\n 10 , 10 , 10 , 200 \n",
    )
    .unwrap();

    let rows = load_trace_csv(&path).expect("load trace");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].points(), Some([(100.0, 200.0), (130.0, 240.0)]));
    assert_eq!(rows[1].points(), None);
    assert_eq!(rows[2].points(), Some([(10.0, 10.0), (10.0, 200.0)]));
}

#[rstest]
#[case("a,b,c,d\n1,2,3,4\n")]
#[case("x1,y1,x2\n1,2,3\n")]
fn rejects_wrong_headers(#[case] body: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    fs::write(&path, body).unwrap();

    let err = load_trace_csv(&path).expect_err("bad headers");
    assert!(format!("{err}").contains("must have headers"));
}

#[test]
fn reports_row_number_of_bad_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    fs::write(&path, "x1,y1,x2,y2\n1,2,3,4\n1,two,3,4\n").unwrap();

    let err = load_trace_csv(&path).expect_err("bad value");
    assert!(format!("{err}").contains("invalid CSV row 3"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = load_trace_csv(&dir.path().join("nope.csv")).expect_err("missing");
    assert!(format!("{err}").contains("open trace CSV"));
}
