use encoding_rs::Encoding;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{local_name, namespace_url, ns, parse_document, parse_fragment, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::utils::{is_full_document, TEXT_SKIP_ELEMENTS};

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// 完整文档（含 doctype / html / head / body 标记）
    Full,
    /// 片段，以 <body> 为上下文解析
    Fragment,
}

/// 一次请求内独占的 DOM 树
///
/// 解析永远成功：html5ever 对畸形标记做尽力恢复。
pub struct Document {
    dom: RcDom,
    kind: DocumentKind,
}

impl Document {
    /// 解析标记字符串，自动判断完整文档或片段
    pub fn parse(html: &str) -> Self {
        if is_full_document(html) {
            Self::parse_full(html)
        } else {
            Self::parse_fragment(html)
        }
    }

    /// 按完整文档解析
    pub fn parse_full(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        Self {
            dom,
            kind: DocumentKind::Full,
        }
    }

    /// 以 <body> 为上下文按片段解析
    pub fn parse_fragment(html: &str) -> Self {
        let dom = parse_fragment(
            RcDom::default(),
            Default::default(),
            QualName::new(None, ns!(html), local_name!("body")),
            vec![],
        )
        .one(html);
        Self {
            dom,
            kind: DocumentKind::Fragment,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// 文档节点
    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    /// 内容根节点：完整文档为 <body>，片段为承载顶层节点的合成 <html>
    pub fn content_root(&self) -> Handle {
        match self.kind {
            DocumentKind::Full => self
                .body()
                .unwrap_or_else(|| self.dom.document.clone()),
            DocumentKind::Fragment => {
                get_child_node_by_name(&self.dom.document, "html")
                    .unwrap_or_else(|| self.dom.document.clone())
            }
        }
    }

    /// <body> 元素（仅完整文档）
    pub fn body(&self) -> Option<Handle> {
        if self.kind != DocumentKind::Full {
            return None;
        }
        // html5ever 总是把 <body> 放在 <html> 正下方
        get_child_node_by_name(&get_child_node_by_name(&self.dom.document, "html")?, "body")
    }

    /// 内容根下既没有元素也没有文本叶子
    pub fn is_empty(&self) -> bool {
        let root = self.content_root();
        !descendants(&root).iter().skip(1).any(|node| match node.data {
            NodeData::Element { .. } => true,
            NodeData::Text { ref contents } => is_text_leaf(&contents.borrow()),
            _ => false,
        })
    }
}

/// 按字符集标签解码 HTML 字节，未知标签按 UTF-8 处理
pub fn decode_html(data: &[u8], document_encoding: &str) -> String {
    if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        string.into_owned()
    } else {
        String::from_utf8_lossy(data).into_owned()
    }
}

/// 查找指定路径的DOM节点
///
/// 路径的每一段依次匹配一个祖先元素，不要求直接相邻。使用显式栈遍历。
pub fn find_nodes(node: &Handle, node_names: Vec<&str>) -> Vec<Handle> {
    let mut found_nodes = Vec::new();
    if node_names.is_empty() {
        return found_nodes;
    }

    let mut stack = vec![(node.clone(), 0usize)];
    while let Some((current, depth)) = stack.pop() {
        let mut next_depth = depth;

        if let NodeData::Element { ref name, .. } = current.data {
            if &*name.local == node_names[depth] {
                if depth + 1 == node_names.len() {
                    found_nodes.push(current.clone());
                } else {
                    next_depth = depth + 1;
                }
            }
        }

        for child_node in current.children.borrow().iter().rev() {
            stack.push((child_node.clone(), next_depth));
        }
    }

    found_nodes
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 设置节点属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    use html5ever::interface::Attribute;
    use html5ever::tendril::format_tendril;
    use html5ever::LocalName;

    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.as_deref() {
                    attrs_mut[i].value.clear();
                    attrs_mut[i].value.push_slice(attr_value);
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                let name = LocalName::from(attr_name);

                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), name),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}

/// 先序遍历，返回包含 `root` 在内的全部节点
///
/// 使用显式栈，深层嵌套的文档不会耗尽调用栈。
pub fn descendants(root: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
        out.push(node);
    }

    out
}

/// 是否含有至少一个非空白字符
pub fn is_text_leaf(text: &str) -> bool {
    !text.trim().is_empty()
}

/// 按文档顺序收集文本叶子节点，跳过脚本类元素内部的文本
pub fn collect_text_leaves(root: &Handle) -> Vec<Handle> {
    let mut leaves = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        match node.data {
            NodeData::Text { ref contents } => {
                if is_text_leaf(&contents.borrow()) {
                    leaves.push(node.clone());
                }
            }
            NodeData::Element { ref name, .. }
                if TEXT_SKIP_ELEMENTS.contains(&&*name.local) => {}
            _ => {
                for child in node.children.borrow().iter().rev() {
                    stack.push(child.clone());
                }
            }
        }
    }

    leaves
}

/// 读取文本节点内容
pub fn get_text(node: &Handle) -> Option<String> {
    match node.data {
        NodeData::Text { ref contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// 替换文本节点内容，非文本节点不受影响
pub fn set_text(node: &Handle, text: &str) {
    if let NodeData::Text { ref contents } = node.data {
        *contents.borrow_mut() = StrTendril::from_slice(text);
    }
}
