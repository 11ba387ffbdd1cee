// tether-core/src/application/transform.rs
//
// Dependency rows -> net-new lineage process records.
// Edges are only anchored between objects the catalog already knows about;
// this stage never creates dataset entities.

use futures::Stream;
use futures::stream;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::domain::dependency::DependencyRow;
use crate::domain::lineage::{CatalogIdentity, CatalogObject, LineageProcessRecord};
use crate::error::TetherError;
use crate::ports::catalog::CatalogGateway;

/// Per-run counters. Skips are expected outcomes, not errors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStats {
    pub rows_seen: usize,
    pub skipped_unknown_referenced: usize,
    pub skipped_unknown_referencing: usize,
    pub skipped_already_ingested: usize,
    pub skipped_duplicate: usize,
    pub emitted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Emit(LineageProcessRecord),
    UnknownReferenced,
    UnknownReferencing,
    AlreadyIngested,
    /// Same edge already emitted earlier in this run.
    Duplicate,
}

pub struct LineageTransformer<'g, G: CatalogGateway + ?Sized> {
    gateway: &'g G,
    memo: Option<HashMap<(String, String), bool>>,
    emitted: HashSet<String>,
    stats: TransformStats,
}

impl<'g, G> LineageTransformer<'g, G>
where
    G: CatalogGateway + ?Sized,
{
    /// `memoize` caches `exists` answers for the lifetime of this transformer.
    /// Output is identical either way; only the number of lookups changes.
    pub fn new(gateway: &'g G, memoize: bool) -> Self {
        Self {
            gateway,
            memo: memoize.then(HashMap::new),
            emitted: HashSet::new(),
            stats: TransformStats::default(),
        }
    }

    pub fn stats(&self) -> TransformStats {
        self.stats
    }

    async fn exists(&mut self, object: CatalogObject<'_>) -> Result<bool, TetherError> {
        let key = (object.qualified_name(), object.type_name());

        if let Some(memo) = &self.memo
            && let Some(found) = memo.get(&key)
        {
            debug!(kind = object.label(), qualified_name = %key.0, found, "Lookup served from memo");
            return Ok(*found);
        }

        debug!(kind = object.label(), qualified_name = %key.0, type_name = %key.1, "Catalog lookup");
        let found = self.gateway.exists(&key.0, &key.1).await?;

        if let Some(memo) = self.memo.as_mut() {
            memo.insert(key, found);
        }
        Ok(found)
    }

    /// Decide one row. Lookups run referenced, referencing, process, and stop
    /// at the first one that rules the row out.
    pub async fn process_row(&mut self, row: &DependencyRow) -> Result<RowOutcome, TetherError> {
        self.stats.rows_seen += 1;

        let referenced = row.referenced_entity();
        if !self.exists(CatalogObject::Entity(&referenced)).await? {
            info!(
                qualified_name = %referenced.qualified_name(),
                "Referenced object not found in catalog, skipping row"
            );
            self.stats.skipped_unknown_referenced += 1;
            return Ok(RowOutcome::UnknownReferenced);
        }

        let referencing = row.referencing_entity();
        if !self.exists(CatalogObject::Entity(&referencing)).await? {
            info!(
                qualified_name = %referencing.qualified_name(),
                "Referencing object not found in catalog, skipping row"
            );
            self.stats.skipped_unknown_referencing += 1;
            return Ok(RowOutcome::UnknownReferencing);
        }

        let record = LineageProcessRecord::new(referenced, referencing);

        if self.emitted.contains(&record.qualified_name) {
            debug!(qualified_name = %record.qualified_name, "Edge already emitted in this run");
            self.stats.skipped_duplicate += 1;
            return Ok(RowOutcome::Duplicate);
        }

        if self.exists(CatalogObject::Process(&record)).await? {
            info!(
                process = %record.name,
                type_name = record.type_name(),
                "Lineage already ingested, skipping"
            );
            self.stats.skipped_already_ingested += 1;
            return Ok(RowOutcome::AlreadyIngested);
        }

        self.emitted.insert(record.qualified_name.clone());
        self.stats.emitted += 1;
        Ok(RowOutcome::Emit(record))
    }

    /// Lazily turn `rows` into new records.
    ///
    /// The stream is single-pass: rows are decided as it is polled, and an
    /// error is yielded once and ends it. Building a second stream over the
    /// same rows issues every lookup again, so materialize the output if it
    /// is needed more than once.
    pub fn records<'t, I>(
        &'t mut self,
        rows: I,
    ) -> impl Stream<Item = Result<LineageProcessRecord, TetherError>> + 't
    where
        I: IntoIterator<Item = DependencyRow>,
        I::IntoIter: 't,
    {
        stream::unfold(
            (Some(self), rows.into_iter()),
            |(this, mut rows)| async move {
                let this = this?;
                while let Some(row) = rows.next() {
                    match this.process_row(&row).await {
                        Ok(RowOutcome::Emit(record)) => {
                            return Some((Ok(record), (Some(this), rows)));
                        }
                        Ok(_) => continue,
                        Err(e) => return Some((Err(e), (None, rows))),
                    }
                }
                None
            },
        )
    }
}
