use crate::model::descriptor::RenderDescriptor;

/// Append-only list of drawing instructions. Paint order is insertion order.
#[derive(Debug, Default)]
pub struct RenderQueue {
    items: Vec<RenderDescriptor>,
}

impl RenderQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction after everything already queued.
    pub fn push(&mut self, item: RenderDescriptor) {
        self.items.push(item);
    }

    /// Append a batch, preserving its order.
    pub fn extend(&mut self, items: impl IntoIterator<Item = RenderDescriptor>) {
        self.items.extend(items);
    }

    /// Read the whole queue in paint order.
    pub fn as_slice(&self) -> &[RenderDescriptor] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every instruction. Only called once a paint pass has been exported.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}
