//! End-to-end scenarios for the mirrored tree: build, reorder, remove, describe

use mirror_dom::{
    describe_tree, Attributes, ChannelSink, Document, EventHandlers, Node, NodeDescription,
    PipelineConfig, RecordingSink, RenderCommand, TreeError,
};
use std::collections::HashSet;
use std::sync::Arc;

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Some(v.to_string())))
        .collect()
}

fn ids(nodes: &[Node]) -> Vec<u64> {
    nodes.iter().map(|node| node.id().as_u64()).collect()
}

#[tokio::test]
async fn test_text_child_insert() {
    let sink = Arc::new(RecordingSink::new());
    let doc = Document::new(sink.clone(), PipelineConfig::default()).unwrap();

    let div = doc.create_tag("div", EventHandlers::new());
    let text = doc.create_text("hi");
    div.insert_at(0, &text).unwrap();

    assert_eq!(div.children().unwrap(), vec![text.clone()]);
    assert_eq!(text.parent(), Some(div.clone()));
    assert_eq!(
        sink.commands(),
        vec![RenderCommand {
            id: text.id(),
            fields: [("value".to_string(), Some("hi".to_string()))].into_iter().collect(),
        }]
    );
}

#[tokio::test]
async fn test_keyed_reorder() {
    let doc = Document::new(Arc::new(RecordingSink::new()), PipelineConfig::default()).unwrap();
    let list = doc.create_tag("ul", EventHandlers::new());
    let items: Vec<Node> = (0..4)
        .map(|_| doc.create_tag("li", EventHandlers::new()))
        .collect();
    for (i, item) in items.iter().enumerate() {
        list.insert_at(i, item).unwrap();
    }
    let (a, b, c, d) = (&items[0], &items[1], &items[2], &items[3]);

    // [B, C] already sits immediately before D
    list.move_children(1, 3, 2).unwrap();
    assert_eq!(ids(&list.children().unwrap()), ids(&items));

    // Move [B, C] after D
    list.move_children(1, 4, 2).unwrap();
    assert_eq!(
        ids(&list.children().unwrap()),
        ids(&[a.clone(), d.clone(), b.clone(), c.clone()])
    );

    // And back to the front
    list.move_children(2, 0, 2).unwrap();
    assert_eq!(
        ids(&list.children().unwrap()),
        ids(&[b.clone(), c.clone(), a.clone(), d.clone()])
    );

    let before: HashSet<u64> = ids(&items).into_iter().collect();
    let after: HashSet<u64> = ids(&list.children().unwrap()).into_iter().collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_remove_middle_child() {
    let doc = Document::new(Arc::new(RecordingSink::new()), PipelineConfig::default()).unwrap();
    let parent = doc.create_tag("div", EventHandlers::new());
    let nodes: Vec<Node> = ["A", "B", "C"].iter().map(|v| doc.create_text(*v)).collect();
    for (i, node) in nodes.iter().enumerate() {
        parent.insert_at(i, node).unwrap();
    }
    doc.root().insert_at(0, &parent).unwrap();

    parent.remove(1, 1).unwrap();

    assert_eq!(ids(&parent.children().unwrap()), ids(&[nodes[0].clone(), nodes[2].clone()]));
    assert!(nodes[1].parent().is_none());
    assert!(!doc.dispatcher().is_registered(nodes[1].id()));

    // Detached nodes may be attached again elsewhere
    doc.root().insert_at(1, &nodes[1]).unwrap();
    assert_eq!(nodes[1].parent(), Some(doc.root().clone()));
    assert!(doc.dispatcher().is_registered(nodes[1].id()));
}

#[tokio::test]
async fn test_identical_attribute_sets_both_forwarded() {
    let (sink, mut commands) = ChannelSink::new();
    let doc = Document::new(Arc::new(sink), PipelineConfig::default()).unwrap();
    let tag = doc.create_tag("span", EventHandlers::new());

    tag.set_attributes(attrs(&[("class", "a")])).unwrap();
    tag.set_attributes(attrs(&[("class", "a")])).unwrap();

    let first = commands.try_recv().unwrap();
    let second = commands.try_recv().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.id, tag.id());
    assert!(commands.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_mutations_leave_tree_intact() {
    let doc = Document::new(Arc::new(RecordingSink::new()), PipelineConfig::default()).unwrap();
    let parent = doc.create_tag("div", EventHandlers::new());
    let a = doc.create_text("A");
    let b = doc.create_text("B");
    parent.insert_at(0, &a).unwrap();
    parent.insert_at(1, &b).unwrap();
    let snapshot = describe_tree(&parent);

    assert!(parent.insert_at(5, &doc.create_text("late")).is_err());
    assert!(parent.move_children(1, 0, 3).is_err());
    assert!(parent.remove(0, 3).is_err());
    assert_eq!(parent.insert_at(0, &a), Err(TreeError::AlreadyAttached(a.id())));

    assert_eq!(describe_tree(&parent), snapshot);
}

#[tokio::test]
async fn test_initial_sync_description() {
    let doc = Document::new(Arc::new(RecordingSink::new()), PipelineConfig::default()).unwrap();
    let button = doc.create_tag("button", EventHandlers::new().on("click", |_| {}));
    button.set_attributes(attrs(&[("type", "submit")])).unwrap();
    button.insert_at(0, &doc.create_text("Send")).unwrap();
    doc.root().insert_at(0, &button).unwrap();

    let tree = describe_tree(doc.root());
    assert_eq!(tree.children.len(), 1);

    match &tree.children[0].node {
        NodeDescription::Tag {
            tag,
            attributes,
            events,
            ..
        } => {
            assert_eq!(tag, "button");
            assert_eq!(attributes.get("type"), Some(&Some("submit".to_string())));
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].as_str(), "click");
        }
        other => panic!("Expected tag description, got {:?}", other),
    }

    match &tree.children[0].children[0].node {
        NodeDescription::Text { value, .. } => assert_eq!(value, "Send"),
        other => panic!("Expected text description, got {:?}", other),
    }
}
