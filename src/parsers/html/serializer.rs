use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, SerializableHandle};

use super::dom::{Document, DocumentKind};

/// 序列化整个文档
///
/// 完整文档输出 doctype 与 <html>，片段只输出顶层节点。
pub fn serialize_document(document: &Document) -> String {
    match document.kind() {
        DocumentKind::Full => serialize_children(document.document()),
        DocumentKind::Fragment => serialize_children(&document.content_root()),
    }
}

/// 序列化内容部分
///
/// 完整文档输出包含标签本身的 <body>，片段输出顶层节点。
pub fn serialize_content(document: &Document) -> String {
    match document.body() {
        Some(body) => serialize_node(&body),
        None => serialize_children(&document.content_root()),
    }
}

/// 序列化节点本身及其子树
pub fn serialize_node(node: &Handle) -> String {
    serialize_with_scope(node, TraversalScope::IncludeNode)
}

/// 只序列化节点的子节点
pub fn serialize_children(node: &Handle) -> String {
    serialize_with_scope(node, TraversalScope::ChildrenOnly(None))
}

fn serialize_with_scope(node: &Handle, traversal_scope: TraversalScope) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let serializable: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };

    if let Err(e) = serialize(&mut buf, &serializable, opts) {
        tracing::error!("DOM 序列化失败: {}", e);
    }

    String::from_utf8_lossy(&buf).into_owned()
}
