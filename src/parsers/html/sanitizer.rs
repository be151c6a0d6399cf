//! 属性清理
//!
//! 去掉表现层属性（class、style 等），只保留允许列表中承载内容的属性。
//! 树的形状保持不变。

use std::collections::BTreeSet;

use markup5ever_rcdom::NodeData;
use serde::{Deserialize, Serialize};

use crate::config::constants;

use super::dom::{descendants, Document};

/// 允许保留的属性名集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeAllowList {
    names: BTreeSet<String>,
}

impl AttributeAllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().trim().to_ascii_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// 空列表：清除所有属性
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for AttributeAllowList {
    fn default() -> Self {
        Self::new(constants::DEFAULT_ALLOWED_ATTRIBUTES)
    }
}

/// 清理文档中每个元素的属性
pub fn sanitize(document: Document, allow_list: &AttributeAllowList) -> Document {
    let mut elements = 0usize;
    let mut removed = 0usize;

    for node in descendants(document.document()) {
        if let NodeData::Element { ref attrs, .. } = node.data {
            elements += 1;
            let mut attrs = attrs.borrow_mut();
            let before = attrs.len();
            attrs.retain(|attr| allow_list.contains(&attr.name.local));
            removed += before - attrs.len();
        }
    }

    tracing::debug!("属性清理完成: {} 个元素, 移除 {} 个属性", elements, removed);
    document
}
