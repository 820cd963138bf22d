use genetree_core::db::open_db_in_memory;
use genetree_core::{
    FsBlobStore, MediaKind, MediaRepository, MediaService, NewMedia, NewPerson, PersonService,
    SqliteMediaRepository,
};
use std::collections::HashSet;

#[test]
fn owned_media_lists_exactly_the_tagged_people_flat() {
    let conn = open_db_in_memory().unwrap();
    let people = PersonService::for_connection(&conn);
    let media = MediaService::for_connection(&conn, FsBlobStore::new("unused", "http://x"));

    let owner = people.create_person(NewPerson::new("Ana", "Souza")).unwrap();
    let bruno = people.create_person(NewPerson::new("Bruno", "Souza")).unwrap();
    let carla = people.create_person(NewPerson::new("Carla", "Souza")).unwrap();
    let photo = SqliteMediaRepository::new(&conn)
        .create_media(&NewMedia {
            kind: MediaKind::Image,
            url: "http://x/reuniao.png".to_string(),
            title: Some("reuniao.png".to_string()),
            person_id: Some(owner.person.id),
        })
        .unwrap();
    media.tag_person(photo.id, bruno.person.id).unwrap();
    media.tag_person(photo.id, carla.person.id).unwrap();

    let owner_read = people.get_person(owner.person.id).unwrap();
    assert_eq!(owner_read.media_items.len(), 1);
    let item = &owner_read.media_items[0];
    assert_eq!(item.id, photo.id);
    assert_eq!(item.kind, MediaKind::Image);
    assert_eq!(item.person_id, Some(owner.person.id));

    let tagged: HashSet<_> = item.tagged_people.iter().map(|person| person.id).collect();
    assert_eq!(tagged, HashSet::from([bruno.person.id, carla.person.id]));
    assert_eq!(item.tagged_people[0].first_name, "Bruno");

    let bruno_read = people.get_person(bruno.person.id).unwrap();
    assert!(bruno_read.media_items.is_empty());
    assert_eq!(people.tagged_in_media(bruno.person.id).unwrap().len(), 1);
}

#[test]
fn serialized_projection_stops_after_two_levels() {
    let conn = open_db_in_memory().unwrap();
    let people = PersonService::for_connection(&conn);
    let media = MediaService::for_connection(&conn, FsBlobStore::new("unused", "http://x"));

    let owner = people.create_person(NewPerson::new("Ana", "Souza")).unwrap();
    let guest = people.create_person(NewPerson::new("Bruno", "Souza")).unwrap();
    let video = SqliteMediaRepository::new(&conn)
        .create_media(&NewMedia {
            kind: MediaKind::Video,
            url: "http://x/festa.mp4".to_string(),
            title: None,
            person_id: Some(owner.person.id),
        })
        .unwrap();
    media.tag_person(video.id, guest.person.id).unwrap();
    media.tag_person(video.id, owner.person.id).unwrap();

    let read = people.get_person(owner.person.id).unwrap();
    let json = serde_json::to_value(&read).unwrap();

    assert_eq!(json["id"], owner.person.id);
    assert_eq!(json["first_name"], "Ana");
    assert_eq!(json["gender"], "other");
    assert!(json.get("person").is_none());

    let item = &json["media_items"][0];
    assert_eq!(item["type"], "video");
    assert_eq!(item["url"], "http://x/festa.mp4");
    assert!(item["title"].is_null());

    let tagged = item["tagged_people"].as_array().unwrap();
    assert_eq!(tagged.len(), 2);
    for person in tagged {
        assert!(person.get("media_items").is_none());
        assert!(person.get("tagged_people").is_none());
        assert!(person.get("first_name").is_some());
    }
}

#[test]
fn media_read_for_unowned_media_has_null_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMediaRepository::new(&conn);
    let media = MediaService::for_connection(&conn, FsBlobStore::new("unused", "http://x"));

    let loose = repo
        .create_media(&NewMedia {
            kind: MediaKind::Image,
            url: "http://x/solta.png".to_string(),
            title: None,
            person_id: None,
        })
        .unwrap();

    let read = media.get_media(loose.id).unwrap();
    assert_eq!(read.person_id, None);
    assert!(read.tagged_people.is_empty());

    let json = serde_json::to_value(&read).unwrap();
    assert!(json["person_id"].is_null());
}
