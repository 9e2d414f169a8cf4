use copyloom_core::{
    Block, BlockBody, ButtonConfig, ButtonSize, CopyDocument, CopyStatus, CopyType,
    CopyValidationError, ListStyle, Session,
};
use uuid::Uuid;

#[test]
fn copy_new_sets_defaults() {
    let workspace = Uuid::new_v4();
    let copy = CopyDocument::new(workspace, "Spring launch", CopyType::Email);

    assert!(!copy.id.is_nil());
    assert_eq!(copy.workspace_id, workspace);
    assert_eq!(copy.title, "Spring launch");
    assert_eq!(copy.copy_type, CopyType::Email);
    assert!(copy.sessions.is_empty());
    assert_eq!(copy.status, CopyStatus::Draft);
    assert!(!copy.is_template);
    assert_eq!(copy.created_by, None);
    assert_eq!(copy.created_at, 0);
    assert_eq!(copy.updated_at, 0);
}

#[test]
fn session_operations_preserve_block_order() {
    let mut session = Session::new("Hero");
    let first = Block::new(BlockBody::headline("Welcome"));
    let second = Block::new(BlockBody::text("Body"));
    let third = Block::new(BlockBody::button("Buy"));
    let first_id = first.id;
    let third_id = third.id;

    session.push_block(first);
    session.push_block(second);
    session.push_block(third);

    assert!(session.move_block(third_id, 0));
    let order: Vec<_> = session.blocks.iter().map(|block| block.id).collect();
    assert_eq!(order[0], third_id);
    assert_eq!(order[1], first_id);

    let removed = session.remove_block(first_id).unwrap();
    assert_eq!(removed.id, first_id);
    assert_eq!(session.blocks.len(), 2);
    assert!(session.block(first_id).is_none());
}

#[test]
fn button_block_serialization_uses_expected_wire_fields() {
    let block_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let block = Block::with_id(
        block_id,
        BlockBody::Button {
            content: "Buy now".to_string(),
            config: ButtonConfig {
                background_color: Some("#ff6600".to_string()),
                text_color: None,
                size: ButtonSize::Large,
                link: Some("https://example.com/buy".to_string()),
            },
        },
    );

    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(json["id"], block_id.to_string());
    assert_eq!(json["type"], "button");
    assert_eq!(json["content"], "Buy now");
    assert_eq!(json["config"]["backgroundColor"], "#ff6600");
    assert_eq!(json["config"]["buttonSize"], "large");
    assert_eq!(json["config"]["link"], "https://example.com/buy");

    let decoded: Block = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, block);
}

#[test]
fn list_block_serialization_keeps_entries_under_content() {
    let block = Block::new(BlockBody::List {
        items: vec!["Fast".to_string(), "Cheap".to_string()],
        style: ListStyle::Numbered,
    });

    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(json["type"], "list");
    assert_eq!(json["content"][0], "Fast");
    assert_eq!(json["content"][1], "Cheap");
    assert_eq!(json["listStyle"], "numbered");

    let decoded: Block = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, block);
}

#[test]
fn block_deserialization_tolerates_missing_and_unknown_fields() {
    let button: Block = serde_json::from_str(
        r#"{
            "id": "22222222-3333-4444-8555-666666666666",
            "type": "button",
            "content": "Go",
            "legacyAlign": "center"
        }"#,
    )
    .unwrap();
    assert_eq!(
        button.body,
        BlockBody::Button {
            content: "Go".to_string(),
            config: ButtonConfig::default(),
        }
    );

    let list: Block = serde_json::from_str(
        r#"{
            "id": "22222222-3333-4444-8555-777777777777",
            "type": "list"
        }"#,
    )
    .unwrap();
    assert_eq!(
        list.body,
        BlockBody::List {
            items: Vec::new(),
            style: ListStyle::Bullet,
        }
    );
}

#[test]
fn validate_rejects_blank_title() {
    let mut copy = CopyDocument::new(Uuid::new_v4(), "  ", CopyType::Ad);
    assert_eq!(copy.validate(), Err(CopyValidationError::BlankTitle));

    copy.title = "Ad set".to_string();
    assert_eq!(copy.validate(), Ok(()));
}

#[test]
fn validate_rejects_duplicate_session_ids() {
    let mut copy = CopyDocument::new(Uuid::new_v4(), "Doubled", CopyType::Ad);
    let session_id = Uuid::new_v4();
    copy.push_session(Session::with_id(session_id, "First"));
    copy.push_session(Session::with_id(session_id, "Second"));

    assert_eq!(
        copy.validate(),
        Err(CopyValidationError::DuplicateSessionId(session_id))
    );
}

#[test]
fn validate_rejects_duplicate_block_ids_within_one_session() {
    let mut copy = CopyDocument::new(Uuid::new_v4(), "Doubled blocks", CopyType::Ad);
    let block_id = Uuid::new_v4();
    let mut session = Session::new("Hero");
    session.push_block(Block::with_id(block_id, BlockBody::text("one")));
    session.push_block(Block::with_id(block_id, BlockBody::text("two")));
    let session_id = session.id;
    copy.push_session(session);

    assert_eq!(
        copy.validate(),
        Err(CopyValidationError::DuplicateBlockId {
            session_id,
            block_id,
        })
    );
}

#[test]
fn validate_allows_same_block_id_in_different_sessions() {
    let mut copy = CopyDocument::new(Uuid::new_v4(), "Shared ids", CopyType::Ad);
    let block_id = Uuid::new_v4();

    let mut first = Session::new("First");
    first.push_block(Block::with_id(block_id, BlockBody::text("one")));
    let mut second = Session::new("Second");
    second.push_block(Block::with_id(block_id, BlockBody::text("two")));

    copy.push_session(first);
    copy.push_session(second);

    assert_eq!(copy.validate(), Ok(()));
}

#[test]
fn copy_type_labels_round_trip() {
    for copy_type in CopyType::ALL {
        assert_eq!(CopyType::parse(copy_type.as_str()), Some(copy_type));
    }
    assert_eq!(CopyType::parse("blog_post"), None);
}
