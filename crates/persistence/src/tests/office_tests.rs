// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck_domain::{Office, OfficeId};

use super::helpers::{create_test_office, create_test_persistence};
use crate::Persistence;

#[test]
fn test_office_round_trip() {
    let mut persistence: Persistence = create_test_persistence();
    let office: Office = persistence
        .get_office(&OfficeId::new("jakarta-hq").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(office, create_test_office("jakarta-hq"));
}

#[test]
fn test_missing_office_is_none() {
    let mut persistence: Persistence = create_test_persistence();
    let office = persistence
        .get_office(&OfficeId::new("nowhere").unwrap())
        .unwrap();
    assert!(office.is_none());
}

#[test]
fn test_upsert_replaces_existing_office() {
    let mut persistence: Persistence = create_test_persistence();
    let mut office: Office = create_test_office("jakarta-hq");
    office.is_active = false;
    office.supervisor_ids = vec![String::from("sup-2")];
    persistence.upsert_office(&office).unwrap();

    let stored: Office = persistence
        .get_office(&office.office_id)
        .unwrap()
        .unwrap();
    assert!(!stored.is_active);
    assert_eq!(stored.supervisor_ids, vec![String::from("sup-2")]);
    assert_eq!(persistence.list_offices().unwrap().len(), 1);
}

#[test]
fn test_offices_supervised_by() {
    let mut persistence: Persistence = create_test_persistence();
    let mut other: Office = create_test_office("bandung");
    other.supervisor_ids = vec![String::from("sup-2")];
    persistence.upsert_office(&other).unwrap();

    let sup1: Vec<OfficeId> = persistence.offices_supervised_by("sup-1").unwrap();
    assert_eq!(sup1, vec![OfficeId::new("jakarta-hq").unwrap()]);

    let nobody: Vec<OfficeId> = persistence.offices_supervised_by("sup-9").unwrap();
    assert!(nobody.is_empty());
}
