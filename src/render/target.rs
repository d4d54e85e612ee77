//! The mount point a renderer appends its output to.

use serde::Serialize;

/// Rendered output attached to a target.
#[derive(Debug, Clone, PartialEq)]
pub enum MountedNode {
    Svg(String),
    Png(Vec<u8>),
}

impl MountedNode {
    pub fn content_type(&self) -> &'static str {
        match self {
            MountedNode::Svg(_) => "image/svg+xml",
            MountedNode::Png(_) => "image/png",
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            MountedNode::Svg(svg) => svg.as_bytes(),
            MountedNode::Png(png) => png,
        }
    }
}

/// A container for rendered output.
///
/// Appending adds a child, like a DOM node; callers clear it before each
/// rebuild so only the latest output remains.
#[derive(Debug, Default)]
pub struct RenderTarget {
    children: Vec<MountedNode>,
    mounts: u64,
}

/// Counters exposed to the API and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetStats {
    pub children: usize,
    pub mounts: u64,
}

impl RenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn append(&mut self, node: MountedNode) {
        self.children.push(node);
        self.mounts += 1;
    }

    /// The most recently appended node.
    pub fn current(&self) -> Option<&MountedNode> {
        self.children.last()
    }

    pub fn children(&self) -> &[MountedNode] {
        &self.children
    }

    pub fn stats(&self) -> TargetStats {
        TargetStats {
            children: self.children.len(),
            mounts: self.mounts,
        }
    }
}
