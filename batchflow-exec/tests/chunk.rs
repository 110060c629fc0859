mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use batchflow_exec::item::{processor_fn, reader_fn, writer_fn, IteratorItemReader, VecItemWriter};
use batchflow_exec::{StepBuilder, StepError};

use common::{step_execution, BadItem};

#[tokio::test]
async fn chunk_step_writes_full_chunks_then_remainder() {
    let writer = VecItemWriter::new();
    let step = StepBuilder::new("numbers")
        .chunk::<i32, i32>(2)
        .reader(IteratorItemReader::new(vec![1, 2, 3, 4, 5]))
        .writer(writer.clone())
        .build()
        .unwrap();

    let mut se = step_execution("numbers");
    step.execute(&mut se).await.unwrap();

    assert_eq!(writer.chunks(), vec![vec![1, 2], vec![3, 4], vec![5]]);
    assert_eq!(se.read_count(), 5);
    assert_eq!(se.write_count(), 5);
    assert_eq!(se.commit_count(), 3);
    assert_eq!(se.rollback_count(), 0);
    assert_eq!(se.exit_status().exit_code(), "COMPLETED");
}

#[tokio::test]
async fn chunk_step_with_exact_multiple_has_no_trailing_write() {
    let writer = VecItemWriter::new();
    let step = StepBuilder::new("numbers")
        .chunk::<i32, i32>(3)
        .reader(IteratorItemReader::new(1..=6))
        .writer(writer.clone())
        .build()
        .unwrap();

    let mut se = step_execution("numbers");
    step.execute(&mut se).await.unwrap();

    assert_eq!(writer.chunk_count(), 2);
    assert_eq!(se.commit_count(), 2);
}

#[tokio::test]
async fn filtered_items_are_counted_but_never_written() {
    let writer = VecItemWriter::new();
    let step = StepBuilder::new("odds")
        .chunk::<i32, i32>(2)
        .reader(IteratorItemReader::new(1..=6))
        .processor(processor_fn(|n: &i32| Ok((n % 2 == 1).then_some(*n))))
        .writer(writer.clone())
        .build()
        .unwrap();

    let mut se = step_execution("odds");
    step.execute(&mut se).await.unwrap();

    assert_eq!(writer.chunks(), vec![vec![1, 3], vec![5]]);
    assert_eq!(se.read_count(), 6);
    assert_eq!(se.filter_count(), 3);
    assert_eq!(se.write_count(), 3);
}

#[tokio::test]
async fn processor_may_change_item_type() {
    let writer = VecItemWriter::new();
    let step = StepBuilder::new("labels")
        .chunk::<i32, String>(10)
        .reader(IteratorItemReader::new(vec![7, 8]))
        .processor(processor_fn(|n: &i32| Ok(Some(format!("item-{n}")))))
        .writer(writer.clone())
        .build()
        .unwrap();

    let mut se = step_execution("labels");
    step.execute(&mut se).await.unwrap();

    assert_eq!(writer.items(), vec!["item-7".to_string(), "item-8".to_string()]);
}

#[tokio::test]
async fn items_pass_through_without_processor() {
    let writer = VecItemWriter::new();
    let step = StepBuilder::new("copy")
        .chunk::<String, String>(2)
        .reader(IteratorItemReader::new(vec!["a".to_string(), "b".to_string()]))
        .writer(writer.clone())
        .build()
        .unwrap();

    let mut se = step_execution("copy");
    step.execute(&mut se).await.unwrap();

    assert_eq!(writer.items(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(se.filter_count(), 0);
}

#[tokio::test]
async fn empty_input_completes_without_writing() {
    let writer = VecItemWriter::<i32>::new();
    let step = StepBuilder::new("empty")
        .chunk::<i32, i32>(4)
        .reader(IteratorItemReader::new(Vec::<i32>::new()))
        .writer(writer.clone())
        .build()
        .unwrap();

    let mut se = step_execution("empty");
    step.execute(&mut se).await.unwrap();

    assert_eq!(writer.chunk_count(), 0);
    assert_eq!(se.read_count(), 0);
    assert_eq!(se.commit_count(), 0);
}

#[tokio::test]
async fn read_failure_stops_step_and_keeps_counts() {
    let reads = AtomicUsize::new(0);
    let writer = VecItemWriter::new();
    let step = StepBuilder::new("flaky-read")
        .chunk::<i32, i32>(5)
        .reader(reader_fn(move || {
            let n = reads.fetch_add(1, Ordering::SeqCst) as i32;
            if n == 2 {
                return Err(BadItem(n).into());
            }
            Ok(Some(n))
        }))
        .writer(writer.clone())
        .build()
        .unwrap();

    let mut se = step_execution("flaky-read");
    let err = step.execute(&mut se).await.unwrap_err();

    assert!(matches!(err, StepError::Read(_)));
    assert!(err.cause().unwrap().downcast_ref::<BadItem>().is_some());
    assert_eq!(se.read_count(), 2);
    assert_eq!(writer.chunk_count(), 0);
}

#[tokio::test]
async fn write_failure_counts_a_rollback() {
    let step = StepBuilder::new("broken-sink")
        .chunk::<i32, i32>(2)
        .reader(IteratorItemReader::new(1..=3))
        .writer(writer_fn(|items: &[i32]| Err(BadItem(items[0]).into())))
        .build()
        .unwrap();

    let mut se = step_execution("broken-sink");
    let err = step.execute(&mut se).await.unwrap_err();

    assert!(matches!(err, StepError::Write(_)));
    assert_eq!(err.to_string(), "failed to write chunk: bad item 1");
    assert_eq!(se.commit_count(), 0);
    assert_eq!(se.rollback_count(), 1);
    assert_eq!(se.write_count(), 0);
    assert_eq!(se.read_count(), 2);
}

#[tokio::test]
async fn process_failure_without_policies_fails_step() {
    let writer = VecItemWriter::new();
    let step = StepBuilder::new("strict")
        .chunk::<i32, i32>(1)
        .reader(IteratorItemReader::new(1..=3))
        .processor(processor_fn(|n: &i32| {
            if *n == 2 {
                Err(BadItem(*n).into())
            } else {
                Ok(Some(*n))
            }
        }))
        .writer(writer.clone())
        .build()
        .unwrap();

    let mut se = step_execution("strict");
    let err = step.execute(&mut se).await.unwrap_err();

    assert!(matches!(err, StepError::Process(_)));
    assert_eq!(writer.items(), vec![1]);
    assert_eq!(se.commit_count(), 1);
    assert_eq!(se.skip_count(), 0);
}
