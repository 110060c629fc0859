use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ItemReader, ItemWriter};

/// Reads items from any iterator, one per call.
pub struct IteratorItemReader<T> {
    items: Mutex<Box<dyn Iterator<Item = T> + Send>>,
}

impl<T> IteratorItemReader<T> {
    pub fn new<It>(items: It) -> Self
    where
        It: IntoIterator<Item = T>,
        It::IntoIter: Send + 'static,
    {
        Self {
            items: Mutex::new(Box::new(items.into_iter())),
        }
    }
}

#[async_trait]
impl<T: Send> ItemReader<T> for IteratorItemReader<T> {
    async fn read(&self) -> Result<Option<T>, anyhow::Error> {
        Ok(self.items.lock().next())
    }
}

/// Collects every written chunk in memory.
///
/// Clones share the same buffer, so a clone can be handed to a step while the
/// first handle is kept for inspection.
#[derive(Clone)]
pub struct VecItemWriter<O> {
    chunks: Arc<Mutex<Vec<Vec<O>>>>,
}

impl<O> Default for VecItemWriter<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> VecItemWriter<O> {
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.lock().len()
    }
}

impl<O: Clone> VecItemWriter<O> {
    pub fn chunks(&self) -> Vec<Vec<O>> {
        self.chunks.lock().clone()
    }

    pub fn items(&self) -> Vec<O> {
        self.chunks.lock().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl<O> ItemWriter<O> for VecItemWriter<O>
where
    O: Clone + Send + Sync,
{
    async fn write(&self, items: &[O]) -> Result<(), anyhow::Error> {
        self.chunks.lock().push(items.to_vec());
        Ok(())
    }
}
