//! Run every transfer concurrently under the permit cap.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::SchedulerError;
use crate::http::StreamOpener;
use crate::sink::SinkOpener;
use crate::transfer::{Transfer, TransferResult};

use super::permits::PermitPool;
use super::Scheduler;

impl<O, S> Scheduler<O, S>
where
    O: StreamOpener,
    S: SinkOpener,
{
    /// Downloads every URL with at most `concurrency_limit` transfers in
    /// flight, returning one result per URL in input order.
    ///
    /// A failed transfer is reported in its result and never stops the
    /// others. `Err` is reserved for scheduler bugs (closed pool, panicked
    /// task).
    pub async fn run_all(
        &self,
        urls: &[String],
        concurrency_limit: usize,
    ) -> Result<Vec<TransferResult>, SchedulerError> {
        self.run_with_pool(urls, Arc::new(PermitPool::new(concurrency_limit)))
            .await
    }

    /// Like [`run_all`](Self::run_all) with a caller-provided pool, so its
    /// counters can be inspected afterwards.
    pub async fn run_with_pool(
        &self,
        urls: &[String],
        pool: Arc<PermitPool>,
    ) -> Result<Vec<TransferResult>, SchedulerError> {
        // Names are resolved for every URL before the first request goes out.
        let transfers: Vec<Transfer> = urls.iter().map(Transfer::new).collect();
        tracing::info!(
            count = transfers.len(),
            limit = pool.capacity(),
            "starting transfers"
        );

        let mut join_set = JoinSet::new();
        for (index, transfer) in transfers.into_iter().enumerate() {
            let opener = Arc::clone(&self.opener);
            let sinks = Arc::clone(&self.sinks);
            let progress = Arc::clone(&self.progress);
            let settings = self.settings.clone();
            let pool = Arc::clone(&pool);
            join_set.spawn(async move {
                let permit = pool.acquire().await?;
                let result = transfer
                    .run(opener.as_ref(), sinks.as_ref(), progress.as_ref(), &settings)
                    .await;
                drop(permit);
                progress.on_finished(&result);
                Ok::<_, SchedulerError>((index, result))
            });
        }

        let mut slots: Vec<Option<TransferResult>> = urls.iter().map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            let (index, result) = joined??;
            slots[index] = Some(result);
        }

        let results = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.ok_or(SchedulerError::MissingResult(i)))
            .collect::<Result<Vec<_>, _>>()?;

        let completed = results.iter().filter(|r| r.is_completed()).count();
        tracing::info!(
            completed,
            failed = results.len() - completed,
            peak = pool.peak(),
            "all transfers finished"
        );
        Ok(results)
    }
}
