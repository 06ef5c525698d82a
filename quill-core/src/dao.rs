use crate::{
    Criteria, Entity, Error, Executor, GenericSqlWriter, Mapping, Result, RowProcessor, RowsAffected,
    SqlWriter, Statement,
    stream::{self, Stream},
};
use futures::TryFutureExt;
use std::marker::PhantomData;

/// Create, read, update and delete operations of one entity type.
///
/// Every operation generates its statement first, failing before anything is
/// sent to the executor, and then delegates the execution.
///
/// ```rust,ignore
/// let dao = Dao::<User>::default();
/// dao.insert(&mut executor, &user).await?;
/// let found = dao.query_one(&mut executor, &User { id: 1, ..Default::default() }).await?;
/// ```
pub struct Dao<E: Entity, W: SqlWriter = GenericSqlWriter> {
    writer: W,
    processor: RowProcessor,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Dao<E> {
    pub fn new(mapping: Mapping) -> Self {
        Self::with_writer(GenericSqlWriter, RowProcessor::new(mapping))
    }
}

impl<E: Entity> Default for Dao<E> {
    fn default() -> Self {
        Self::new(Mapping::default())
    }
}

impl<E: Entity, W: SqlWriter + Clone> Clone for Dao<E, W> {
    fn clone(&self) -> Self {
        Self::with_writer(self.writer.clone(), self.processor.clone())
    }
}

impl<E: Entity, W: SqlWriter> Dao<E, W> {
    pub fn with_writer(writer: W, processor: RowProcessor) -> Self {
        Self {
            writer,
            processor,
            _entity: PhantomData,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn processor(&self) -> &RowProcessor {
        &self.processor
    }

    pub fn mapping(&self) -> &Mapping {
        self.processor.mapping()
    }

    pub async fn insert<Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &E,
    ) -> Result<RowsAffected> {
        let statement = self.writer.write_insert(self.mapping(), entity)?;
        execute(executor, statement).await
    }

    pub async fn update_all<Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &E,
    ) -> Result<RowsAffected> {
        let statement = self.writer.write_update_all(self.mapping(), entity)?;
        execute(executor, statement).await
    }

    pub async fn update_selected<Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &E,
    ) -> Result<RowsAffected> {
        let statement = self.writer.write_update_selected(self.mapping(), entity)?;
        execute(executor, statement).await
    }

    pub async fn delete<Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &E,
    ) -> Result<RowsAffected> {
        let statement = self.writer.write_delete(self.mapping(), entity)?;
        execute(executor, statement).await
    }

    /// Record with the same primary key as `entity`.
    pub async fn query_one<Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &E,
    ) -> Result<Option<E>> {
        let statement = self.writer.write_select_one(self.mapping(), entity)?;
        let mut cursor = query(executor, statement).await?;
        self.processor.to_record(&mut cursor)
    }

    /// Records matching every non null field of `entity`.
    pub async fn query_list<Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &E,
    ) -> Result<Vec<E>> {
        let statement = self.writer.write_select_many(self.mapping(), entity)?;
        let mut cursor = query(executor, statement).await?;
        self.processor.to_record_list(&mut cursor)
    }

    pub async fn query_by_criteria<Exec: Executor>(
        &self,
        executor: &mut Exec,
        criteria: &Criteria,
    ) -> Result<Vec<E>> {
        let statement = self
            .writer
            .write_select_by_criteria::<E>(self.mapping(), criteria)?;
        let mut cursor = query(executor, statement).await?;
        self.processor.to_record_list(&mut cursor)
    }

    /// Records from a hand written statement, columns are correlated by label.
    pub async fn query_raw<Exec: Executor>(
        &self,
        executor: &mut Exec,
        statement: impl Into<Statement>,
    ) -> Result<Vec<E>> {
        let mut cursor = query(executor, statement.into()).await?;
        self.processor.to_record_list(&mut cursor)
    }

    /// Same as [`Dao::query_list`] but yields the records one at a time.
    pub fn stream_list<'a, Exec: Executor>(
        &self,
        executor: &'a mut Exec,
        entity: &E,
    ) -> impl Stream<Item = Result<E>> + Send + use<'a, E, W, Exec> {
        let statement = self.writer.write_select_many(self.mapping(), entity);
        let processor = self.processor.clone();
        async move {
            let cursor = query(executor, statement?).await?;
            Ok::<_, Error>(stream::iter(processor.records::<E, _>(cursor)))
        }
        .try_flatten_stream()
    }
}

fn log_statement(statement: &Statement) {
    log::debug!(
        "{} with {} parameters",
        statement,
        statement.params.len()
    );
}

async fn execute<Exec: Executor>(executor: &mut Exec, statement: Statement) -> Result<RowsAffected> {
    log_statement(&statement);
    executor.execute(statement).await
}

async fn query<Exec: Executor>(executor: &mut Exec, statement: Statement) -> Result<Exec::Cursor> {
    log_statement(&statement);
    executor.query(statement).await
}
