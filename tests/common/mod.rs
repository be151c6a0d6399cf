// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

use markup5ever_rcdom::{Handle, NodeData};

use restyler::parsers::html::{collect_text_leaves, descendants, get_text, Document};
use restyler::RestyleConfig;

/// HTML 测试辅助工具
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    /// 解析测试文档
    pub fn parse(html: &str) -> Document {
        Document::parse(html)
    }

    /// 按先序返回所有元素名，用于比较树形
    pub fn element_names(html: &str) -> Vec<String> {
        let document = Self::parse(html);
        descendants(&document.content_root())
            .iter()
            .filter_map(|node| match &node.data {
                NodeData::Element { name, .. } => Some(name.local.to_string()),
                _ => None,
            })
            .collect()
    }

    /// 每个元素的子节点数量（含空白文本）
    pub fn child_counts(html: &str) -> Vec<usize> {
        let document = Self::parse(html);
        descendants(&document.content_root())
            .iter()
            .filter(|node| matches!(node.data, NodeData::Element { .. }))
            .map(|node| node.children.borrow().len())
            .collect()
    }

    /// 每个元素的属性名
    pub fn attribute_names(html: &str) -> Vec<Vec<String>> {
        let document = Self::parse(html);
        descendants(&document.content_root())
            .iter()
            .filter_map(|node| match &node.data {
                NodeData::Element { attrs, .. } => Some(
                    attrs
                        .borrow()
                        .iter()
                        .map(|attr| attr.name.local.to_string())
                        .collect(),
                ),
                _ => None,
            })
            .collect()
    }

    /// 文本叶子内容（去掉首尾空白）
    pub fn text_leaves(html: &str) -> Vec<String> {
        let document = Self::parse(html);
        collect_text_leaves(&document.content_root())
            .iter()
            .filter_map(get_text)
            .map(|text| text.trim().to_string())
            .collect()
    }

    /// 模拟翻译：对每个文本叶子应用 `translate`，返回片段
    pub fn translate_leaves<F>(html: &str, translate: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let document = Self::parse(html);
        for leaf in collect_text_leaves(&document.content_root()) {
            if let Some(text) = get_text(&leaf) {
                restyler::parsers::html::set_text(&leaf, &translate(&text));
            }
        }
        restyler::parsers::html::serialize_content(&document)
    }

    /// 所有 `<a>` 的 href
    pub fn hrefs(html: &str) -> Vec<String> {
        let document = Self::parse(html);
        descendants(&document.content_root())
            .iter()
            .filter(|node| Self::is_anchor(node))
            .filter_map(|node| restyler::parsers::html::get_node_attr(node, "href"))
            .collect()
    }

    fn is_anchor(node: &Handle) -> bool {
        matches!(&node.data, NodeData::Element { name, .. } if &*name.local == "a")
    }

    /// 带样式的完整页面
    pub fn create_styled_page() -> String {
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Pricing</title>
    <style>.hero { color: red; }</style>
</head>
<body class="page" data-theme="dark">
    <header id="top" class="hero" style="padding: 4px">
        <h1 class="title">Simple pricing</h1>
        <p>Pay <strong class="accent">once</strong>, use forever.</p>
    </header>
    <main role="main">
        <ul class="plans">
            <li><a href="/plans/basic" class="btn">Basic</a></li>
            <li><a href="https://example.com/plans/pro" class="btn">Pro</a></li>
        </ul>
        <img src="/img/hero.png" alt="Hero" width="640">
        <script>var tracked = "do not translate";</script>
    </main>
</body>
</html>"#
            .to_string()
    }

    /// 带样式的片段
    pub fn create_styled_fragment() -> String {
        r#"<div class="card" style="margin:0"><h2 id="h" class="t">Hello</h2><p>First <em class="i">second</em> third</p><a href="https://other.org/" title="Other" onclick="x()">Out</a></div>"#
            .to_string()
    }
}

/// 测试配置构建器
pub struct TestConfigBuilder {
    config: RestyleConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RestyleConfig::default(),
        }
    }

    pub fn with_site_domain(mut self, domain: &str) -> Self {
        self.config.site_domain = Some(domain.to_string());
        self
    }

    pub fn with_default_locale(mut self, locale: &str) -> Self {
        self.config.default_locale = locale.to_string();
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = Some(threads);
        self
    }

    pub fn build(self) -> RestyleConfig {
        self.config
    }
}
