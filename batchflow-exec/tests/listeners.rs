mod common;

use std::sync::Arc;

use parking_lot::Mutex;

use batchflow_core::StepExecution;
use batchflow_exec::item::{processor_fn, writer_fn, IteratorItemReader, VecItemWriter};
use batchflow_exec::listener::StepExecutionListener;
use batchflow_exec::StepBuilder;

use common::{step_execution, BadItem, Recorder};

#[tokio::test]
async fn read_and_write_listeners_fire_in_order() {
    let recorder = Recorder::new();
    let step = StepBuilder::new("ordered")
        .chunk::<i32, i32>(2)
        .reader(IteratorItemReader::new(vec![1, 2, 3]))
        .writer(VecItemWriter::new())
        .read_listener(recorder.clone())
        .write_listener(recorder.clone())
        .build()
        .unwrap();

    let mut se = step_execution("ordered");
    step.execute(&mut se).await.unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "before_read",
            "after_read(1)",
            "before_read",
            "after_read(2)",
            "before_write([1,2])",
            "after_write([1,2])",
            "before_read",
            "after_read(3)",
            "before_read",
            "before_write([3])",
            "after_write([3])",
        ]
    );
}

#[tokio::test]
async fn every_listener_kind_fires_around_its_phase() {
    let recorder = Recorder::new();
    let step = StepBuilder::new("all")
        .chunk::<i32, i32>(2)
        .reader(IteratorItemReader::new(vec![1, 2]))
        .processor(processor_fn(|n: &i32| Ok((*n != 2).then_some(n * 10))))
        .writer(VecItemWriter::new())
        .listener(recorder.clone())
        .chunk_listener(recorder.clone())
        .read_listener(recorder.clone())
        .process_listener(recorder.clone())
        .write_listener(recorder.clone())
        .build()
        .unwrap();

    let mut se = step_execution("all");
    step.execute(&mut se).await.unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "before_step(all)",
            "before_read",
            "after_read(1)",
            "before_process(1)",
            "after_process(1->10)",
            "before_read",
            "after_read(2)",
            "before_process(2)",
            "after_process(2->filtered)",
            "before_read",
            "before_chunk",
            "before_write([10])",
            "after_write([10])",
            "after_chunk",
            "after_step(all)",
        ]
    );
}

#[tokio::test]
async fn write_error_notifies_write_then_chunk_listeners() {
    let recorder = Recorder::new();
    let step = StepBuilder::new("failing-write")
        .chunk::<i32, i32>(1)
        .reader(IteratorItemReader::new(vec![5]))
        .writer(writer_fn(|_: &[i32]| Err(BadItem(5).into())))
        .listener(recorder.clone())
        .chunk_listener(recorder.clone())
        .write_listener(recorder.clone())
        .build()
        .unwrap();

    let mut se = step_execution("failing-write");
    step.execute(&mut se).await.unwrap_err();

    assert_eq!(
        recorder.events(),
        vec![
            "before_step(failing-write)",
            "before_chunk",
            "before_write([5])",
            "on_write_error([5])",
            "after_chunk_error",
            "after_step(failing-write)",
        ]
    );
}

#[derive(Clone, Default)]
struct LastCounts(Arc<Mutex<Option<(u64, u64)>>>);

impl StepExecutionListener for LastCounts {
    fn after_step(&self, step_execution: &StepExecution) {
        *self.0.lock() = Some((step_execution.read_count(), step_execution.commit_count()));
    }
}

#[tokio::test]
async fn step_listener_sees_folded_counts_after_failure() {
    let counts = LastCounts::default();
    let step = StepBuilder::new("partial")
        .chunk::<i32, i32>(1)
        .reader(IteratorItemReader::new(vec![1, 2]))
        .processor(processor_fn(|n: &i32| {
            if *n == 2 {
                Err(BadItem(2).into())
            } else {
                Ok(Some(*n))
            }
        }))
        .writer(VecItemWriter::new())
        .listener(counts.clone())
        .build()
        .unwrap();

    let mut se = step_execution("partial");
    step.execute(&mut se).await.unwrap_err();

    assert_eq!(*counts.0.lock(), Some((2, 1)));
}
