use chrono::NaiveDate;
use genetree_core::db::open_db_in_memory;
use genetree_core::{
    NewPerson, PersonListQuery, PersonPatch, PersonRepository, PersonService, RepoError,
    ServiceError, SqlitePersonRepository, ValidationError, DEFAULT_GENDER,
};
use std::collections::HashSet;

#[test]
fn create_assigns_unique_ids_and_default_gender() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);

    let ana = service.create_person(NewPerson::new("Ana", "Souza")).unwrap();
    let bruno = service
        .create_person(NewPerson {
            gender: Some("male".to_string()),
            ..NewPerson::new("Bruno", "Souza")
        })
        .unwrap();

    assert_ne!(ana.person.id, bruno.person.id);
    assert_eq!(ana.person.gender, DEFAULT_GENDER);
    assert_eq!(bruno.person.gender, "male");
    assert!(ana.media_items.is_empty());
    assert_eq!(ana.person.birth_date, None);
    assert_eq!(ana.person.father_id, None);
}

#[test]
fn create_then_get_roundtrip_preserves_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);

    let created = service
        .create_person(NewPerson {
            gender: Some("female".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1942, 7, 22),
            death_date: NaiveDate::from_ymd_opt(2010, 11, 5),
            bio: Some("Avó".to_string()),
            photo_url: Some("http://localhost:8000/static/uploads/nilsa.png".to_string()),
            ..NewPerson::new("Nilsa", "...")
        })
        .unwrap();

    let loaded = service.get_person(created.person.id).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.person.death_date, NaiveDate::from_ymd_opt(2010, 11, 5));
}

#[test]
fn get_missing_person_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);

    let err = service.get_person(404).unwrap_err();
    assert!(matches!(err, ServiceError::PersonNotFound(404)));
    assert!(err.is_not_found());
}

#[test]
fn create_rejects_blank_names() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);

    let err = service.create_person(NewPerson::new("Ana", " ")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankField("last_name"))
    ));
}

#[test]
fn blank_gender_is_rejected_on_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);

    let create_err = service
        .create_person(NewPerson {
            gender: Some("  ".to_string()),
            ..NewPerson::new("Ana", "Souza")
        })
        .unwrap_err();
    assert!(matches!(
        create_err,
        ServiceError::Validation(ValidationError::BlankField("gender"))
    ));
    assert_eq!(service.count_people().unwrap(), 0);

    let ana = service.create_person(NewPerson::new("Ana", "Souza")).unwrap();
    let update_err = service
        .update_person(
            ana.person.id,
            PersonPatch {
                gender: Some("  ".to_string()),
                ..PersonPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        update_err,
        ServiceError::Validation(ValidationError::BlankField("gender"))
    ));
    assert_eq!(service.get_person(ana.person.id).unwrap().person.gender, DEFAULT_GENDER);
}

#[test]
fn parents_round_trip_through_partial_update() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);

    let father = service
        .create_person(NewPerson::new("José Emerson", "Beppler"))
        .unwrap();
    let mother = service
        .create_person(NewPerson::new("Eliane", "Beppler"))
        .unwrap();
    let child = service
        .create_person(NewPerson {
            father_id: Some(father.person.id),
            mother_id: Some(mother.person.id),
            bio: Some("old".to_string()),
            ..NewPerson::new("Murilo", "Beppler")
        })
        .unwrap();

    let loaded = service.get_person(child.person.id).unwrap();
    assert_eq!(loaded.person.father_id, Some(father.person.id));
    assert_eq!(loaded.person.mother_id, Some(mother.person.id));

    let updated = service
        .update_person(
            child.person.id,
            PersonPatch {
                bio: Some(Some("Entusiasta de tecnologia".to_string())),
                ..PersonPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.person.bio.as_deref(), Some("Entusiasta de tecnologia"));
    assert_eq!(updated.person.father_id, Some(father.person.id));
    assert_eq!(updated.person.mother_id, Some(mother.person.id));

    let reloaded = service.get_person(child.person.id).unwrap();
    assert_eq!(reloaded, updated);
}

#[test]
fn update_leaves_omitted_fields_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);

    let before = service
        .create_person(NewPerson {
            gender: Some("male".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1940, 2, 10),
            bio: Some("bio".to_string()),
            photo_url: Some("http://x/p.png".to_string()),
            father_id: Some(77),
            ..NewPerson::new("Lino", "Beppler")
        })
        .unwrap();

    let after = service
        .update_person(
            before.person.id,
            PersonPatch {
                first_name: Some("Lino José".to_string()),
                ..PersonPatch::default()
            },
        )
        .unwrap();

    let mut expected = before.clone();
    expected.person.first_name = "Lino José".to_string();
    assert_eq!(after, expected);
}

#[test]
fn update_with_explicit_null_clears_only_that_field() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);

    let before = service
        .create_person(NewPerson {
            photo_url: Some("http://x/p.png".to_string()),
            bio: Some("keep me".to_string()),
            ..NewPerson::new("Ana", "Souza")
        })
        .unwrap();

    let patch: PersonPatch = serde_json::from_str(r#"{"photo_url": null}"#).unwrap();
    let after = service.update_person(before.person.id, patch).unwrap();

    assert_eq!(after.person.photo_url, None);
    assert_eq!(after.person.bio.as_deref(), Some("keep me"));
}

#[test]
fn empty_patch_is_a_no_op_and_missing_person_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);
    let before = service.create_person(NewPerson::new("Ana", "Souza")).unwrap();

    let after = service
        .update_person(before.person.id, PersonPatch::default())
        .unwrap();
    assert_eq!(after, before);

    let err = service
        .update_person(999, PersonPatch::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::PersonNotFound(999)));
}

#[test]
fn parent_links_are_not_validated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let orphan = repo
        .create_person(&NewPerson {
            father_id: Some(12345),
            ..NewPerson::new("Ana", "Souza")
        })
        .unwrap();
    assert_eq!(orphan.father_id, Some(12345));

    let own_parent = repo
        .update_person(
            orphan.id,
            &PersonPatch {
                mother_id: Some(Some(orphan.id)),
                ..PersonPatch::default()
            },
        )
        .unwrap();
    assert_eq!(own_parent.mother_id, Some(orphan.id));
}

#[test]
fn search_matches_first_or_last_name_substring() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);
    let eliane = service
        .create_person(NewPerson::new("Eliane", "Beppler"))
        .unwrap();
    let murilo = service
        .create_person(NewPerson::new("Murilo", "Beppler"))
        .unwrap();
    let nilsa = service.create_person(NewPerson::new("Nilsa", "...")).unwrap();

    let bep: HashSet<_> = service
        .list_people(0, None, Some("Bep".to_string()))
        .unwrap()
        .into_iter()
        .map(|read| read.person.id)
        .collect();
    assert_eq!(bep, HashSet::from([eliane.person.id, murilo.person.id]));

    let only_nilsa = service
        .list_people(0, None, Some("Nilsa".to_string()))
        .unwrap();
    assert_eq!(only_nilsa.len(), 1);
    assert_eq!(only_nilsa[0].person.id, nilsa.person.id);

    let inner = service
        .list_people(0, None, Some("uril".to_string()))
        .unwrap();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].person.id, murilo.person.id);
}

#[test]
fn search_is_case_sensitive_and_empty_term_matches_everyone() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);
    service
        .create_person(NewPerson::new("Eliane", "Beppler"))
        .unwrap();
    service.create_person(NewPerson::new("Lino", "Souza")).unwrap();

    let lower = service
        .list_people(0, None, Some("bep".to_string()))
        .unwrap();
    assert!(lower.is_empty());

    let everyone = service.list_people(0, None, Some(String::new())).unwrap();
    assert_eq!(everyone.len(), 2);
}

#[test]
fn list_paginates_in_stable_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);
    let mut ids = Vec::new();
    for idx in 0..7 {
        ids.push(
            repo.create_person(&NewPerson::new(format!("Person{idx}"), "Souza"))
                .unwrap()
                .id,
        );
    }

    let page = |offset, limit| {
        repo.list_people(&PersonListQuery {
            search: None,
            limit: Some(limit),
            offset,
        })
        .unwrap()
        .into_iter()
        .map(|person| person.id)
        .collect::<Vec<_>>()
    };

    assert_eq!(page(0, 3), ids[0..3].to_vec());
    assert_eq!(page(3, 3), ids[3..6].to_vec());
    assert_eq!(page(6, 3), ids[6..7].to_vec());
    assert!(page(7, 3).is_empty());

    let defaulted = repo.list_people(&PersonListQuery::default()).unwrap();
    assert_eq!(defaulted.len(), 7);
}

#[test]
fn list_children_returns_direct_children_only() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::for_connection(&conn);
    let grandpa = service.create_person(NewPerson::new("Lino", "Beppler")).unwrap();
    let father = service
        .create_person(NewPerson {
            father_id: Some(grandpa.person.id),
            ..NewPerson::new("José Emerson", "Beppler")
        })
        .unwrap();
    let child = service
        .create_person(NewPerson {
            father_id: Some(father.person.id),
            ..NewPerson::new("Murilo", "Beppler")
        })
        .unwrap();

    let children = service.list_children(grandpa.person.id).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, father.person.id);

    let grandchildren = service.list_children(father.person.id).unwrap();
    assert_eq!(grandchildren.len(), 1);
    assert_eq!(grandchildren[0].id, child.person.id);

    assert!(service.list_children(child.person.id).unwrap().is_empty());
    assert!(matches!(
        service.list_children(999).unwrap_err(),
        ServiceError::PersonNotFound(999)
    ));
}

#[test]
fn repository_update_of_missing_person_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let err = repo
        .update_person(5, &PersonPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(genetree_core::EntityRef::Person(5))
    ));
}
