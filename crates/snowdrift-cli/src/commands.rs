use core::time::Duration;
use std::{io::Write, thread};

use anyhow::{Context, anyhow};
use serde::Serialize;
use snowdrift::{
    AtomicIdGenerator, IdGenerator, MonotonicClock, NodeId, SnowflakeGenerator, SnowflakeId,
    SystemClock, TimeSource,
};

use crate::config::Strategy;

/// Generates `count` IDs on `threads` threads sharing one generator and
/// returns them sorted.
pub fn generate(
    node: NodeId,
    epoch: Duration,
    count: usize,
    threads: usize,
    strategy: Strategy,
    monotonic: bool,
) -> anyhow::Result<Vec<SnowflakeId>> {
    tracing::info!(
        %node,
        epoch_ms = epoch.as_millis() as u64,
        count,
        threads,
        ?strategy,
        monotonic,
        "generating ids"
    );

    match (strategy, monotonic) {
        (Strategy::Lock, false) => run(
            IdGenerator::with_time(node, epoch, SystemClock),
            count,
            threads,
        ),
        (Strategy::Lock, true) => run(
            IdGenerator::with_time(node, epoch, MonotonicClock::new()),
            count,
            threads,
        ),
        (Strategy::Atomic, false) => run(
            AtomicIdGenerator::with_time(node, epoch, SystemClock),
            count,
            threads,
        ),
        (Strategy::Atomic, true) => run(
            AtomicIdGenerator::with_time(node, epoch, MonotonicClock::new()),
            count,
            threads,
        ),
    }
}

fn run<G, T>(generator: G, count: usize, threads: usize) -> anyhow::Result<Vec<SnowflakeId>>
where
    G: SnowflakeGenerator<T> + Sync,
    T: TimeSource,
{
    let per_thread = count / threads;
    let remainder = count % threads;
    let generator = &generator;

    let batches = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let n = per_thread + usize::from(i < remainder);
                s.spawn(move || {
                    tracing::debug!(thread = i, ids = n, "worker started");
                    (0..n)
                        .map(|_| generator.next_id())
                        .collect::<snowdrift::Result<Vec<_>>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| -> anyhow::Result<Vec<SnowflakeId>> {
                let batch = handle
                    .join()
                    .map_err(|_| anyhow!("generator thread panicked"))?
                    .context("failed to generate id")?;
                Ok(batch)
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    let mut ids: Vec<_> = batches.into_iter().flatten().collect();
    ids.sort_unstable();
    Ok(ids)
}

pub fn write_ids(out: &mut impl Write, ids: &[SnowflakeId]) -> anyhow::Result<()> {
    for id in ids {
        writeln!(out, "{id}")?;
    }
    out.flush()?;
    Ok(())
}

/// The fields of one ID, resolved against an epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoded {
    pub id: SnowflakeId,
    pub unix_millis: u64,
    pub timestamp: u64,
    pub partition_id: u64,
    pub worker_id: u64,
    pub sequence: u64,
}

impl Decoded {
    pub fn new(id: SnowflakeId, epoch: Duration) -> anyhow::Result<Self> {
        let unix_millis = id.unix_millis(epoch).ok_or_else(|| {
            anyhow!(
                "id {id} with epoch {} ms is past the end of the u64 millisecond range",
                epoch.as_millis()
            )
        })?;
        Ok(Self {
            id,
            unix_millis,
            timestamp: id.timestamp(),
            partition_id: id.partition_id(),
            worker_id: id.worker_id(),
            sequence: id.sequence(),
        })
    }
}

pub fn decode(inputs: &[String], epoch: Duration) -> anyhow::Result<Vec<Decoded>> {
    inputs
        .iter()
        .map(|input| {
            let id: SnowflakeId = input.trim().parse()?;
            Decoded::new(id, epoch)
        })
        .collect()
}

pub fn write_decoded(
    out: &mut impl Write,
    decoded: &[Decoded],
    json: bool,
) -> anyhow::Result<()> {
    for d in decoded {
        if json {
            serde_json::to_writer(&mut *out, d)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "{} unix_ms={} timestamp={} partition_id={} worker_id={} sequence={}",
                d.id, d.unix_millis, d.timestamp, d.partition_id, d.worker_id, d.sequence
            )?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowdrift::DEFAULT_EPOCH;
    use std::collections::HashSet;

    fn node() -> NodeId {
        NodeId::new(3, 7).unwrap()
    }

    #[test]
    fn generate_splits_count_across_threads() {
        for strategy in [Strategy::Lock, Strategy::Atomic] {
            let ids = generate(node(), DEFAULT_EPOCH, 10_001, 4, strategy, true).unwrap();
            assert_eq!(ids.len(), 10_001);
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(ids.iter().copied().collect::<HashSet<_>>().len(), ids.len());
            assert!(ids.iter().all(|id| id.node() == node()));
        }
    }

    #[test]
    fn generate_with_more_threads_than_ids() {
        let ids = generate(node(), DEFAULT_EPOCH, 3, 8, Strategy::Lock, false).unwrap();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn decode_reports_fields() {
        let id = SnowflakeId::from_components(1_234, 3, 7, 42);
        let decoded = decode(&[id.to_string()], DEFAULT_EPOCH).unwrap();
        assert_eq!(
            decoded,
            vec![Decoded {
                id,
                unix_millis: DEFAULT_EPOCH.as_millis() as u64 + 1_234,
                timestamp: 1_234,
                partition_id: 3,
                worker_id: 7,
                sequence: 42,
            }]
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(&["abc".into()], DEFAULT_EPOCH).is_err());
        assert!(decode(&["-5".into()], DEFAULT_EPOCH).is_err());
    }

    #[test]
    fn decode_rejects_epoch_that_overflows() {
        let err = decode(&["4194304".into()], Duration::from_millis(u64::MAX)).unwrap_err();
        assert!(err.to_string().contains("u64 millisecond range"));

        let decoded = decode(&["0".into()], Duration::from_millis(u64::MAX)).unwrap();
        assert_eq!(decoded[0].unix_millis, u64::MAX);
    }

    #[test]
    fn decoded_output_formats() {
        let id = SnowflakeId::from_components(5, 1, 2, 3);
        let decoded = [Decoded::new(id, Duration::ZERO).unwrap()];

        let mut text = Vec::new();
        write_decoded(&mut text, &decoded, false).unwrap();
        assert_eq!(
            String::from_utf8(text).unwrap(),
            format!("{id} unix_ms=5 timestamp=5 partition_id=1 worker_id=2 sequence=3\n")
        );

        let mut json = Vec::new();
        write_decoded(&mut json, &decoded, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["id"], serde_json::json!(id.to_raw()));
        assert_eq!(value["sequence"], 3);
    }

    #[test]
    fn write_ids_one_per_line() {
        let ids = [SnowflakeId::from_raw(1), SnowflakeId::from_raw(2)];
        let mut out = Vec::new();
        write_ids(&mut out, &ids).unwrap();
        assert_eq!(out, b"1\n2\n");
    }
}
