//! 样式还原模块
//!
//! 翻译服务拿到的是清理过属性的简化 HTML，返回的结构可能与原文有出入，
//! 但文本按阅读顺序一一对应。本模块把译文文本放回原文带样式的结构中。
//!
//! 三种对齐策略：
//!
//! - `Flat`: 按文档顺序逐个替换文本叶子（默认）
//! - `Recursive`: 两棵树同步逐层下降，结构不一致的层保持原文
//! - `Replace`: 译文自带内容容器时直接采用译文

use std::fmt;
use std::str::FromStr;

use markup5ever_rcdom::{Handle, NodeData};
use serde::{Deserialize, Serialize};

use crate::parsers::html::dom::{collect_text_leaves, get_node_name, get_text, is_text_leaf, set_text};
use crate::parsers::html::utils::{CONTENT_CONTAINERS, TEXT_SKIP_ELEMENTS};
use crate::parsers::html::{Document, DocumentKind};

/// 对齐策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreMode {
    /// 按文档顺序逐个替换文本叶子
    #[default]
    Flat,
    /// 同步递归下降
    Recursive,
    /// 整体采用译文
    Replace,
}

impl fmt::Display for RestoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RestoreMode::Flat => "flat",
            RestoreMode::Recursive => "recursive",
            RestoreMode::Replace => "replace",
        };
        f.write_str(name)
    }
}

impl FromStr for RestoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(RestoreMode::Flat),
            "recursive" | "sync" => Ok(RestoreMode::Recursive),
            "replace" | "full" => Ok(RestoreMode::Replace),
            other => Err(format!(
                "Invalid restore mode '{}'. Use: flat, recursive, replace",
                other
            )),
        }
    }
}

/// 把译文文本还原到原文结构中
///
/// 任一文档为空时原样返回 `original`。
pub fn restore(original: Document, translated: Document, mode: RestoreMode) -> Document {
    if original.is_empty() || translated.is_empty() {
        tracing::debug!("原文或译文为空，跳过样式还原");
        return original;
    }

    match mode {
        RestoreMode::Flat => {
            align_flat(&original.content_root(), &translated.content_root());
            original
        }
        RestoreMode::Recursive => {
            align_recursive(&original.content_root(), &translated.content_root());
            original
        }
        RestoreMode::Replace => {
            if has_content_container(&translated) {
                tracing::debug!("译文包含内容容器，整体采用译文");
                translated
            } else {
                tracing::warn!("译文缺少内容容器，回退到逐叶对齐");
                align_flat(&original.content_root(), &translated.content_root());
                original
            }
        }
    }
}

/// 逐叶对齐，返回替换的叶子数
fn align_flat(original_root: &Handle, translated_root: &Handle) -> usize {
    let original_leaves = collect_text_leaves(original_root);
    let translated_leaves = collect_text_leaves(translated_root);
    let mut replaced = 0;

    for (target, source) in original_leaves.iter().zip(translated_leaves.iter()) {
        if let Some(text) = get_text(source) {
            set_text(target, &text);
            replaced += 1;
        }
    }

    tracing::debug!(
        "逐叶对齐: 原文 {} 个, 译文 {} 个, 替换 {} 个",
        original_leaves.len(),
        translated_leaves.len(),
        replaced
    );
    replaced
}

/// 同步递归下降，返回替换的叶子数
fn align_recursive(original_root: &Handle, translated_root: &Handle) -> usize {
    let mut replaced = 0;
    let mut skipped_levels = 0;
    let mut pending = vec![(original_root.clone(), translated_root.clone())];

    while let Some((original, translated)) = pending.pop() {
        let original_children = significant_children(&original);
        let translated_children = significant_children(&translated);

        if !level_matches(&original_children, &translated_children) {
            skipped_levels += 1;
            continue;
        }

        for (o, t) in original_children.into_iter().zip(translated_children) {
            let both_text = matches!(
                (&o.data, &t.data),
                (NodeData::Text { .. }, NodeData::Text { .. })
            );

            if !both_text {
                // 脚本类元素参与结构比较，但其中的文本不替换
                let skipped = get_node_name(&o)
                    .map(|name| TEXT_SKIP_ELEMENTS.contains(&name))
                    .unwrap_or(false);
                if !skipped {
                    pending.push((o, t));
                }
            } else if let Some(text) = get_text(&t) {
                set_text(&o, &text);
                replaced += 1;
            }
        }
    }

    tracing::debug!(
        "递归对齐: 替换 {} 个, 结构不一致跳过 {} 层",
        replaced,
        skipped_levels
    );
    replaced
}

/// 元素与非空文本子节点
fn significant_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| match child.data {
            NodeData::Element { .. } => true,
            NodeData::Text { ref contents } => is_text_leaf(&contents.borrow()),
            _ => false,
        })
        .cloned()
        .collect()
}

/// 同一层的数量、节点类型和标签名是否逐一一致
fn level_matches(original: &[Handle], translated: &[Handle]) -> bool {
    original.len() == translated.len()
        && original.iter().zip(translated).all(|(o, t)| match (&o.data, &t.data) {
            (NodeData::Text { .. }, NodeData::Text { .. }) => true,
            (NodeData::Element { .. }, NodeData::Element { .. }) => {
                get_node_name(o) == get_node_name(t)
            }
            _ => false,
        })
}

/// 译文是否带有可识别的内容容器
fn has_content_container(document: &Document) -> bool {
    if document.kind() == DocumentKind::Full && document.body().is_some() {
        return true;
    }

    significant_children(&document.content_root())
        .iter()
        .filter_map(get_node_name)
        .any(|name| CONTENT_CONTAINERS.contains(&name))
}
