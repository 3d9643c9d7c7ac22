use super::*;

fn sample() -> (MemoryDom, NodeId, NodeId, NodeId) {
    let dom = MemoryDom::new();
    let root = dom.add_root(NodeKind::Block);
    let pane = dom.add(root, NodeKind::ConversationPane, "");
    let link = dom.add(pane, NodeKind::Link, "resume the conversation");
    (dom, root, pane, link)
}

#[test]
fn subtree_text_concatenates_in_document_order() {
    let (dom, root, pane, _link) = sample();
    dom.add(pane, NodeKind::Generic, "trailing");
    assert_eq!(dom.text(root), "resume the conversation trailing");
    assert_eq!(dom.text(pane), "resume the conversation trailing");
}

#[test]
fn descendants_are_depth_first() {
    let (dom, root, pane, link) = sample();
    let extra = dom.add(pane, NodeKind::Generic, "");
    assert_eq!(dom.descendants(root), vec![pane, link, extra]);
}

#[test]
fn visibility_requires_visible_ancestors() {
    let (dom, _root, pane, link) = sample();
    assert!(dom.is_visible(link));
    dom.set_visible(pane, false);
    assert!(!dom.is_visible(link));
    assert!(dom.is_attached(link));
}

#[test]
fn detach_invalidates_attachment() {
    let (dom, _root, pane, link) = sample();
    dom.detach(pane);
    assert!(!dom.is_attached(pane));
    assert!(!dom.is_attached(link));
    assert!(!dom.is_visible(link));
    // The handle is still known to the arena.
    assert_eq!(dom.kind(link), Some(NodeKind::Link));
}

#[test]
fn click_records_and_emits_untrusted_event() {
    let (dom, _root, _pane, link) = sample();
    let mut rx = dom.watch_input();
    dom.click(link);
    assert_eq!(dom.clicks(), vec![link]);
    let ev = rx.try_recv().unwrap();
    assert!(!ev.trusted);
    assert_eq!(ev.kind, InputKind::Synthetic);
}

#[test]
fn trusted_events_reach_subscribers() {
    let dom = MemoryDom::new();
    let mut rx = dom.watch_input();
    dom.emit_trusted(InputKind::Key);
    let ev = rx.try_recv().unwrap();
    assert!(ev.trusted);
    assert_eq!(ev.kind, InputKind::Key);
}

#[test]
fn toasts_mount_and_remove() {
    let dom = MemoryDom::new();
    let a = dom.mount_toast("one", ToastSeverity::Normal);
    let _b = dom.mount_toast("two", ToastSeverity::Error);
    assert_eq!(dom.toasts().len(), 2);
    dom.remove_node(a);
    assert_eq!(dom.toasts(), vec![("two".to_string(), ToastSeverity::Error)]);
}

#[test]
fn highlight_tracking() {
    let (dom, _root, _pane, link) = sample();
    dom.set_highlight(link, true);
    assert_eq!(dom.highlighted(), vec![link]);
    dom.set_highlight(link, false);
    assert!(dom.highlighted().is_empty());
}
