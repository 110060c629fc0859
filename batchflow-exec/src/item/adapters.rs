use async_trait::async_trait;

use batchflow_core::{ExecutionContext, RepeatStatus, StepContribution};

use super::{ItemProcessor, ItemReader, ItemWriter, Tasklet};

/// Reader backed by a closure. The closure owns whatever state it needs.
pub struct FnItemReader<F> {
    f: F,
}

pub fn reader_fn<T, F>(f: F) -> FnItemReader<F>
where
    F: Fn() -> Result<Option<T>, anyhow::Error> + Send + Sync,
{
    FnItemReader { f }
}

#[async_trait]
impl<T, F> ItemReader<T> for FnItemReader<F>
where
    F: Fn() -> Result<Option<T>, anyhow::Error> + Send + Sync,
    T: Send,
{
    async fn read(&self) -> Result<Option<T>, anyhow::Error> {
        (self.f)()
    }
}

pub struct FnItemProcessor<F> {
    f: F,
}

pub fn processor_fn<I, O, F>(f: F) -> FnItemProcessor<F>
where
    F: Fn(&I) -> Result<Option<O>, anyhow::Error> + Send + Sync,
{
    FnItemProcessor { f }
}

#[async_trait]
impl<I, O, F> ItemProcessor<I, O> for FnItemProcessor<F>
where
    F: Fn(&I) -> Result<Option<O>, anyhow::Error> + Send + Sync,
    I: Sync,
    O: Send,
{
    async fn process(&self, item: &I) -> Result<Option<O>, anyhow::Error> {
        (self.f)(item)
    }
}

pub struct FnItemWriter<F> {
    f: F,
}

pub fn writer_fn<O, F>(f: F) -> FnItemWriter<F>
where
    F: Fn(&[O]) -> Result<(), anyhow::Error> + Send + Sync,
{
    FnItemWriter { f }
}

#[async_trait]
impl<O, F> ItemWriter<O> for FnItemWriter<F>
where
    F: Fn(&[O]) -> Result<(), anyhow::Error> + Send + Sync,
    O: Sync,
{
    async fn write(&self, items: &[O]) -> Result<(), anyhow::Error> {
        (self.f)(items)
    }
}

pub struct FnTasklet<F> {
    f: F,
}

pub fn tasklet_fn<F>(f: F) -> FnTasklet<F>
where
    F: Fn(&mut StepContribution, &ExecutionContext) -> Result<RepeatStatus, anyhow::Error>
        + Send
        + Sync,
{
    FnTasklet { f }
}

#[async_trait]
impl<F> Tasklet for FnTasklet<F>
where
    F: Fn(&mut StepContribution, &ExecutionContext) -> Result<RepeatStatus, anyhow::Error>
        + Send
        + Sync,
{
    async fn execute(
        &self,
        contribution: &mut StepContribution,
        context: &ExecutionContext,
    ) -> Result<RepeatStatus, anyhow::Error> {
        (self.f)(contribution, context)
    }
}
