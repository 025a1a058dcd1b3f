mod common;

use common::TestDir;
use serial_test::serial;

use chertdb::{BTreeIndex, Error, IndexCursor, OpenMode, PAGE_SIZE, PagedFile, RecordId};

fn rid(k: i32) -> RecordId {
    RecordId::new(k, k)
}

#[test]
fn test_empty_open_close_reopen() {
    let dir = TestDir::new("empty-reopen");
    let path = dir.index_path("t.idx");

    let index = BTreeIndex::open(&path, OpenMode::Write).expect("open failed");
    index.close().expect("close failed");

    // The file exists and holds only the header page: root -1, height 0
    let pf = PagedFile::open(&path, OpenMode::Read).expect("reopen failed");
    assert_eq!(pf.end_pid(), 1);
    let mut header = [0u8; PAGE_SIZE];
    pf.read_page(0, &mut header).expect("header read failed");
    assert_eq!(i32::from_le_bytes(header[0..4].try_into().unwrap()), -1);
    assert_eq!(i32::from_le_bytes(header[4..8].try_into().unwrap()), 0);
    pf.close().expect("close failed");

    let index = BTreeIndex::open(&path, OpenMode::Read).expect("reopen failed");
    let mut cursor = IndexCursor::default();
    assert!(matches!(
        index.locate(5, &mut cursor),
        Err(Error::NoSuchRecord)
    ));
    index.close().expect("close failed");
}

#[test]
fn test_header_round_trip() {
    let dir = TestDir::new("header");
    let path = dir.index_path("t.idx");

    let mut index = BTreeIndex::open(&path, OpenMode::Write).expect("open failed");
    for key in 1..=300 {
        index.insert(key, rid(key)).expect("insert failed");
    }
    let root_pid = index.root_pid();
    let height = index.height();
    assert_eq!(height, 2);
    index.close().expect("close failed");

    let index = BTreeIndex::open(&path, OpenMode::Read).expect("reopen failed");
    assert_eq!(index.root_pid(), root_pid);
    assert_eq!(index.height(), height);
}

#[test]
#[serial]
fn test_reopen_after_bulk_insert() {
    let dir = TestDir::new("bulk-reopen");
    let path = dir.index_path("t.idx");

    let mut index = BTreeIndex::open(&path, OpenMode::Write).expect("open failed");
    for key in 1..=9999 {
        index.insert(key, rid(key)).expect("insert failed");
    }
    index.close().expect("close failed");

    let index = BTreeIndex::open(&path, OpenMode::Read).expect("reopen failed");
    let mut cursor = IndexCursor::default();
    index.locate(7777, &mut cursor).expect("locate failed");
    let (key, record) = index.read_forward(&mut cursor).expect("read_forward failed");
    assert_eq!((key, record), (7777, rid(7777)));
}

#[test]
#[serial]
fn test_every_key_survives_reopen() {
    let dir = TestDir::new("survive-all");
    let path = dir.index_path("t.idx");

    let mut index = BTreeIndex::open(&path, OpenMode::Write).expect("open failed");
    for key in 1..=2000 {
        index.insert(key, rid(key)).expect("insert failed");
    }
    index.close().expect("close failed");

    let index = BTreeIndex::open(&path, OpenMode::Read).expect("reopen failed");
    for key in 1..=2000 {
        let mut cursor = IndexCursor::default();
        index
            .locate(key, &mut cursor)
            .expect("key lost across reopen");
        let (got, record) = index.read_forward(&mut cursor).expect("read_forward failed");
        assert_eq!((got, record), (key, rid(key)));
    }
}

#[test]
fn test_reopen_write_and_continue() {
    let dir = TestDir::new("continue");
    let path = dir.index_path("t.idx");

    let mut index = BTreeIndex::open(&path, OpenMode::Write).expect("open failed");
    for key in 1..=100 {
        index.insert(key, rid(key)).expect("insert failed");
    }
    index.close().expect("close failed");

    let mut index = BTreeIndex::open(&path, OpenMode::Write).expect("reopen failed");
    for key in 101..=200 {
        index.insert(key, rid(key)).expect("insert failed");
    }
    index.close().expect("close failed");

    let index = BTreeIndex::open(&path, OpenMode::Read).expect("reopen failed");
    let mut cursor = IndexCursor::default();
    assert!(index.locate(1, &mut cursor).is_ok());

    let mut expected = 1;
    while cursor.pid != 0 {
        let (key, record) = index.read_forward(&mut cursor).expect("read_forward failed");
        assert_eq!((key, record), (expected, rid(expected)));
        expected += 1;
    }
    assert_eq!(expected, 201);
}
