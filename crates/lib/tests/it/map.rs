//! Ordered facade: establishment order across set, bulk replace, append,
//! compose, and subtree removal.

use std::collections::HashMap;

use navmap::map::OrderedMap;
use navmap::node::Node;
use navmap::path::FullPath;
use navmap::value::{Leaf, Scalar};

fn segs(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

fn order(paths: &[&[&str]]) -> Vec<Vec<String>> {
    paths.iter().map(|p| segs(p)).collect()
}

fn full(path: &str, slice: &[&str]) -> FullPath {
    FullPath::from_slice(path, segs(slice))
}

#[test]
fn establishment_order_follows_writes() {
    let mut nm = OrderedMap::new();

    nm.set(&full("Field1", &["Field1"]), Node::leaf(10)).unwrap();
    assert_eq!(nm.ordered_paths(), order(&[&["Field1"]]));

    nm.set(&full("Field2[0]", &["Field2", "0"]), Node::leaf("1001"))
        .unwrap();
    nm.set(
        &full("Field2[1].Account[0]", &["Field2", "1", "Account", "0"]),
        Node::leaf(10),
    )
    .unwrap();
    nm.set(
        &full("Field2[1].Account[1]", &["Field2", "1", "Account", "1"]),
        Node::leaf(11),
    )
    .unwrap();
    nm.set(&full("Field2[2]", &["Field2", "2"]), Node::leaf(111))
        .unwrap();
    nm.set(
        &full("Field3.Field4.Field5", &["Field3", "Field4", "Field5"]),
        Node::leaf(5),
    )
    .unwrap();

    assert_eq!(
        nm.ordered_paths(),
        order(&[
            &["Field1"],
            &["Field2", "0"],
            &["Field2", "1", "Account", "0"],
            &["Field2", "1", "Account", "1"],
            &["Field2", "2"],
            &["Field3", "Field4", "Field5"],
        ])
    );
    assert!(!nm.is_empty());
    assert_eq!(
        nm.tree(),
        &Node::Map(HashMap::from([
            ("Field1".to_string(), Node::leaf(10)),
            (
                "Field2".to_string(),
                Node::seq(vec![
                    Node::leaf("1001"),
                    Node::Map(HashMap::from([(
                        "Account".to_string(),
                        Node::seq(vec![Node::leaf(10), Node::leaf(11)]),
                    )])),
                    Node::leaf(111),
                ]),
            ),
            (
                "Field3".to_string(),
                Node::Map(HashMap::from([(
                    "Field4".to_string(),
                    Node::Map(HashMap::from([(
                        "Field5".to_string(),
                        Node::leaf(5),
                    )])),
                )])),
            ),
        ]))
    );

    // replacing the whole Field2 sequence re-establishes it at the back
    nm.set_as_slice(
        &full("Field2", &["Field2"]),
        vec![Node::leaf("500"), Node::leaf("502")],
    )
    .unwrap();
    assert_eq!(
        nm.ordered_paths(),
        order(&[
            &["Field1"],
            &["Field3", "Field4", "Field5"],
            &["Field2", "0"],
            &["Field2", "1"],
        ])
    );
    let val = nm.field(&segs(&["Field2", "0"])).unwrap();
    assert_eq!(val.value, "500");
}

#[test]
fn set_records_one_entry_per_established_field() {
    let mut nm = OrderedMap::new();
    assert!(
        nm.set(&FullPath::default(), Node::leaf(1))
            .is_err_and(|e| e.is_wrong_path())
    );

    nm.set(&full("Field1.0", &["Field1", "0"]), Node::leaf("1001"))
        .unwrap();
    assert_eq!(nm.ordered_paths(), order(&[&["Field1", "0"]]));

    assert!(
        nm.set(&full("Field1[0]", &["Field1", "0", ""]), Node::leaf("1001"))
            .is_err_and(|e| e.is_wrong_path())
    );
    assert!(
        nm.set_as_slice(&full("Field1[0]", &["Field1", "0", ""]), vec![])
            .is_err_and(|e| e.is_wrong_path())
    );
    assert!(
        nm.set_as_slice(&full("Field1[10]", &["Field1", "10"]), vec![])
            .is_err_and(|e| e.is_not_found())
    );

    // overwriting the same element keeps the single ledger entry
    nm.set(&full("Field1.0", &["Field1", "0"]), Node::leaf("1002"))
        .unwrap();
    assert_eq!(nm.ordered_paths(), order(&[&["Field1", "0"]]));
    assert_eq!(nm.field(&segs(&["Field1", "0"])).unwrap().value, "1002");

    nm.set(&full("Field2", &["Field2"]), Node::leaf("1002")).unwrap();
    nm.set(&full("Field1.1", &["Field1", "1"]), Node::leaf("1003"))
        .unwrap();
    assert_eq!(
        nm.ordered_paths(),
        order(&[&["Field1", "0"], &["Field2"], &["Field1", "1"]])
    );

    nm.set_as_slice(
        &full("Field3", &["Field3"]),
        vec![Node::leaf("1004"), Node::leaf("1005")],
    )
    .unwrap();
    nm.set_as_slice(
        &full("Field1", &["Field1"]),
        vec![Node::leaf("1005"), Node::leaf("1006")],
    )
    .unwrap();
    assert_eq!(
        nm.ordered_paths(),
        order(&[
            &["Field2"],
            &["Field3", "0"],
            &["Field3", "1"],
            &["Field1", "0"],
            &["Field1", "1"],
        ])
    );
}

#[test]
fn sequence_elements_group_under_a_stripped_key() {
    let mut nm = OrderedMap::new();
    nm.set(&full("Account", &["Account", "0"]), Node::leaf(1001))
        .unwrap();
    nm.set(
        &full("Account", &["Account", "1"]),
        Node::leaf("account_on_new_branch"),
    )
    .unwrap();
    assert_eq!(
        nm.ordered_paths(),
        order(&[&["Account", "0"], &["Account", "1"]])
    );
}

#[test]
fn reset_moves_field_to_back() {
    let mut nm = OrderedMap::new();
    nm.set(&full("a.b", &["a", "b"]), Node::leaf("x")).unwrap();
    nm.set(&full("a.c", &["a", "c"]), Node::leaf("y")).unwrap();
    nm.set(&full("a.b", &["a", "b"]), Node::leaf("z")).unwrap();
    assert_eq!(nm.ordered_paths(), order(&[&["a", "c"], &["a", "b"]]));
    assert_eq!(nm.field(&segs(&["a", "b"])).unwrap().value, "z");
}

#[test]
fn reads() {
    let mut nm = OrderedMap::new();
    assert!(
        nm.field(&segs(&["Field1"]))
            .is_err_and(|e| e.is_not_found())
    );

    nm.set(&full("Field1", &["Field1"]), Node::leaf("1001")).unwrap();
    nm.set(
        &full("Field3.Field4", &["Field3", "Field4"]),
        Node::leaf("Val"),
    )
    .unwrap();
    nm.set_as_slice(
        &full("Field5", &["Field5"]),
        vec![Node::leaf(10), Node::leaf(101)],
    )
    .unwrap();

    assert!(nm.field(&[]).is_err_and(|e| e.is_wrong_path()));
    assert_eq!(nm.field(&segs(&["Field1"])).unwrap().value, "1001");
    // container targets are not leaves
    assert!(
        nm.field(&segs(&["Field5"]))
            .is_err_and(|e| e.is_not_found())
    );

    // read paths may still carry inline bracket notation
    assert_eq!(
        nm.field_as_value(&["Field5[0]"]).unwrap().as_leaf().unwrap().value,
        10
    );
    assert_eq!(
        nm.field_as_value(&["Field3", "Field4"])
            .unwrap()
            .as_leaf()
            .unwrap()
            .value,
        "Val"
    );
    assert_eq!(nm.field_as_str(&["Field5[0]"]).unwrap(), "10");
    assert_eq!(nm.field_as_str(&["Field3", "Field4"]).unwrap(), "Val");
    assert_eq!(nm.field_as_str(&["Field5"]).unwrap(), "[10,101]");
}

#[test]
fn ledger_survives_interleaved_writes() {
    let mut nm = OrderedMap::new();
    nm.set(
        &full("Field1.Field2[0]", &["Field1", "Field2", "0"]),
        Node::leaf("1003"),
    )
    .unwrap();
    nm.set(
        &full("Field1.Field2[1]", &["Field1", "Field2", "1"]),
        Node::leaf("Val"),
    )
    .unwrap();
    nm.set(
        &full("Field3.Field4.Field5", &["Field3", "Field4", "Field5", "0"]),
        Node::leaf("1001"),
    )
    .unwrap();
    nm.set(
        &full("Field1.Field2[2]", &["Field1", "Field2", "2"]),
        Node::leaf(101),
    )
    .unwrap();
    assert_eq!(
        nm.ordered_paths(),
        order(&[
            &["Field1", "Field2", "0"],
            &["Field1", "Field2", "1"],
            &["Field3", "Field4", "Field5", "0"],
            &["Field1", "Field2", "2"],
        ])
    );
}

#[test]
fn remove_prunes_ledger_entries() {
    let mut nm = OrderedMap::new();
    nm.set(&full("Field2", &["Field2"]), Node::leaf("1003")).unwrap();
    nm.set(
        &full("Field3.Field4", &["Field3", "Field4"]),
        Node::leaf("Val"),
    )
    .unwrap();
    nm.set(&full("Field1", &["Field1"]), Node::leaf("1001")).unwrap();
    nm.set_as_slice(
        &full("Field5", &["Field5"]),
        vec![Node::leaf(10), Node::leaf(101)],
    )
    .unwrap();

    assert!(
        nm.remove(&FullPath::default())
            .is_err_and(|e| e.is_wrong_path())
    );
    // idempotent miss on a top-level key
    nm.remove(&full("field", &["field"])).unwrap();
    // deeper walk through a missing key
    assert!(
        nm.remove(&full("-1", &["-1", ""]))
            .is_err_and(|e| e.is_wrong_path())
    );
    assert_eq!(
        nm.ordered_paths(),
        order(&[
            &["Field2"],
            &["Field3", "Field4"],
            &["Field1"],
            &["Field5", "0"],
            &["Field5", "1"],
        ])
    );

    nm.remove(&full("Field2", &["Field2"])).unwrap();
    assert_eq!(
        nm.ordered_paths(),
        order(&[
            &["Field3", "Field4"],
            &["Field1"],
            &["Field5", "0"],
            &["Field5", "1"],
        ])
    );

    // removing a sequence drops every element entry grouped under it
    nm.remove(&full("Field5", &["Field5"])).unwrap();
    assert_eq!(
        nm.ordered_paths(),
        order(&[&["Field3", "Field4"], &["Field1"]])
    );

    assert!(
        nm.remove(&full("Field1[0]", &["Field1", "0", ""]))
            .is_err_and(|e| e.is_wrong_path())
    );
}

#[test]
fn remove_surfaces_index_parse_errors() {
    let mut nm = OrderedMap::new();
    nm.set_as_slice(&full("Field1", &["Field1"]), vec![]).unwrap();
    let err = nm
        .remove(&full("Field1[nan]", &["Field1", "nan", ""]))
        .unwrap_err();
    assert!(err.is_index_error());
    assert_eq!(err.to_string(), "invalid digit found in string");
}

#[test]
fn errors_wrap_into_the_crate_error() {
    let mut nm = OrderedMap::new();
    let err: navmap::Error = nm.field(&segs(&["missing"])).unwrap_err().into();
    assert!(err.is_not_found());
    assert_eq!(err.module(), "map");

    assert_eq!(nm.to_json_string().unwrap(), "{}");
    nm.set(&full("Field1", &["Field1"]), Node::leaf(1001)).unwrap();
    assert_eq!(nm.to_json_string().unwrap(), r#"{"Field1":1001}"#);
}

#[test]
fn remove_all_resets_state() {
    let mut nm = OrderedMap::new();
    nm.set(&full("Field2", &["Field2"]), Node::leaf("1003")).unwrap();
    nm.set(
        &full("Field3.Field4", &["Field3", "Field4"]),
        Node::leaf("Val"),
    )
    .unwrap();
    nm.set_as_slice(
        &full("Field5", &["Field5"]),
        vec![Node::leaf(10), Node::leaf(101)],
    )
    .unwrap();

    nm.remove_all();
    assert!(nm.is_empty());
    assert_eq!(nm.len(), 0);
    assert!(nm.ordered_paths().is_empty());

    // usable again after the reset
    nm.set(&full("Field1", &["Field1"]), Node::leaf(1)).unwrap();
    assert_eq!(nm.ordered_paths(), order(&[&["Field1"]]));
}

#[test]
fn ordered_fields_replay_live_values() {
    let mut nm = OrderedMap::new();
    nm.set(
        &full("Field1.Field2[0]", &["Field1", "Field2", "0"]),
        Node::leaf("1003"),
    )
    .unwrap();
    nm.set(
        &full("Field1.Field3[0]", &["Field1", "Field3", "0"]),
        Node::leaf("1004"),
    )
    .unwrap();
    nm.set(&full("Field5", &["Field5"]), Node::leaf("1005")).unwrap();
    nm.set(&full("Field6", &["Field6"]), Node::leaf("1006")).unwrap();
    nm.remove(&full("Field5", &["Field5"])).unwrap();

    assert_eq!(
        nm.ordered_fields(),
        vec![
            Scalar::Text("1003".to_string()),
            Scalar::Text("1004".to_string()),
            Scalar::Text("1006".to_string()),
        ]
    );
    assert_eq!(
        nm.ordered_fields_as_strings(),
        vec!["1003".to_string(), "1004".to_string(), "1006".to_string()]
    );
}

#[test]
fn append_keys_each_element_exactly() {
    let mut nm = OrderedMap::new();
    assert_eq!(nm.append(&full("s", &["s"]), Leaf::new(1)).unwrap(), 0);
    assert_eq!(nm.append(&full("s", &["s"]), Leaf::new(2)).unwrap(), 1);
    assert_eq!(nm.ordered_paths(), order(&[&["s", "0"], &["s", "1"]]));

    nm.remove(&full("s", &["s"])).unwrap();
    assert!(nm.ordered_paths().is_empty());
    assert!(nm.is_empty());
}

#[test]
fn compose_updates_in_place() {
    let mut nm = OrderedMap::new();
    nm.set(&full("head", &["head"]), Node::leaf("h")).unwrap();
    nm.compose(&full("f", &["f"]), Leaf::new("ab")).unwrap();
    assert_eq!(nm.ordered_paths(), order(&[&["head"], &["f", "0"]]));

    // concatenation refreshes the existing entry instead of adding one
    nm.compose(&full("f", &["f"]), Leaf::new("cd")).unwrap();
    assert_eq!(nm.ordered_paths(), order(&[&["head"], &["f", "0"]]));
    assert_eq!(nm.field(&segs(&["f", "0"])).unwrap().value, "abcd");

    assert!(
        nm.compose(&FullPath::default(), Leaf::new("x"))
            .is_err_and(|e| e.is_wrong_path())
    );
}
