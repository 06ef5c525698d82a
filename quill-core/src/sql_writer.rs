use crate::{
    ColumnMapping, Criteria, Entity, EntityMetadata, Mapping, Operator, OrmError, Predicate,
    Result, Statement, Value, separated_by,
};

/// Column name paired with the value bound to it.
type Bound = (&'static str, Value);

/// Renders the statements of the mapping engine.
///
/// The `write_*` hooks decide how single fragments look and can be overridden
/// by a dialect; the generators assemble complete [`Statement`]s from entity
/// metadata and either a record or a [`Criteria`].
///
/// Every generator either returns a complete statement or fails before any
/// text is produced.
pub trait SqlWriter {
    /// Alias of the table in `select` statements.
    fn table_alias(&self) -> &str {
        "tb"
    }

    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push_str(value);
    }

    fn write_placeholder(&self, out: &mut String) {
        out.push('?');
    }

    /// `column =?`, used both in `set` lists and in generated filters.
    fn write_assignment(&self, out: &mut String, column: &str) {
        self.write_identifier(out, column);
        out.push_str(" =");
        self.write_placeholder(out);
    }

    fn write_predicate(&self, out: &mut String, value: &Predicate) {
        out.push_str(&value.name);
        match value.operator {
            Operator::Equal => {
                out.push_str(" =");
                self.write_placeholder(out);
            }
            Operator::Like => {
                out.push_str(" like ");
                self.write_placeholder(out);
            }
            Operator::IsNull => out.push_str(" is null"),
        }
    }

    fn write_predicates(&self, out: &mut String, predicates: &[Predicate]) {
        separated_by(
            out,
            predicates,
            |out, v| self.write_predicate(out, v),
            " and ",
        );
    }

    /// `select tb.column field, .. from table tb`
    fn write_select_from(&self, out: &mut String, metadata: &EntityMetadata) {
        let alias = self.table_alias();
        out.push_str("select ");
        separated_by(
            out,
            metadata.all_columns(),
            |out, v| {
                out.push_str(alias);
                out.push('.');
                self.write_identifier(out, v.column);
                out.push(' ');
                self.write_identifier(out, v.field);
            },
            ", ",
        );
        out.push_str(" from ");
        self.write_identifier(out, metadata.table);
        out.push(' ');
        out.push_str(alias);
    }

    fn write_insert<E: Entity>(&self, mapping: &Mapping, entity: &E) -> Result<Statement>
    where
        Self: Sized,
    {
        let metadata = mapping.metadata::<E>()?;
        let values = bind_columns(mapping, &metadata, entity, metadata.all_columns(), false)?;
        let mut out = String::with_capacity(128);
        out.push_str("insert into ");
        self.write_identifier(&mut out, metadata.table);
        out.push_str(" (");
        separated_by(
            &mut out,
            &values,
            |out, (column, _)| self.write_identifier(out, column),
            ", ",
        );
        out.push_str(") values (");
        separated_by(&mut out, &values, |out, _| self.write_placeholder(out), ", ");
        out.push(')');
        Ok(statement(out, values))
    }

    /// Every ordinary column is assigned, null values included.
    fn write_update_all<E: Entity>(&self, mapping: &Mapping, entity: &E) -> Result<Statement>
    where
        Self: Sized,
    {
        let metadata = mapping.metadata::<E>()?;
        if metadata.primary_key.is_empty() {
            return Err(OrmError::MissingKey(metadata.table.into()).into());
        }
        if metadata.columns.is_empty() {
            return Err(OrmError::EmptyUpdate(metadata.table.into()).into());
        }
        let set = bind_columns(mapping, &metadata, entity, metadata.columns.iter(), false)?;
        let filter = bind_key(mapping, &metadata, entity)?;
        Ok(write_update(self, &metadata, set, filter))
    }

    /// Only the columns whose value is not null are assigned, the whole
    /// primary key is required.
    fn write_update_selected<E: Entity>(
        &self,
        mapping: &Mapping,
        entity: &E,
    ) -> Result<Statement>
    where
        Self: Sized,
    {
        let metadata = mapping.metadata::<E>()?;
        let set = bind_columns(mapping, &metadata, entity, metadata.columns.iter(), true)?;
        if set.is_empty() {
            return Err(OrmError::EmptyUpdate(metadata.table.into()).into());
        }
        let filter = bind_key(mapping, &metadata, entity)?;
        Ok(write_update(self, &metadata, set, filter))
    }

    /// Every non null field of the record becomes a filter.
    fn write_delete<E: Entity>(&self, mapping: &Mapping, entity: &E) -> Result<Statement>
    where
        Self: Sized,
    {
        let metadata = mapping.metadata::<E>()?;
        let filter = bind_columns(mapping, &metadata, entity, metadata.all_columns(), true)?;
        if filter.is_empty() {
            return Err(OrmError::EmptyUpdate(metadata.table.into()).into());
        }
        let mut out = String::with_capacity(64);
        out.push_str("delete from ");
        self.write_identifier(&mut out, metadata.table);
        out.push_str(" where ");
        write_filter(self, &mut out, &filter);
        Ok(statement(out, filter))
    }

    /// Select by the primary key of the record, every key field must be set.
    fn write_select_one<E: Entity>(&self, mapping: &Mapping, entity: &E) -> Result<Statement>
    where
        Self: Sized,
    {
        let metadata = mapping.metadata::<E>()?;
        let filter = bind_key(mapping, &metadata, entity)?;
        let mut out = String::with_capacity(128);
        self.write_select_from(&mut out, &metadata);
        out.push_str(" where ");
        write_filter(self, &mut out, &filter);
        Ok(statement(out, filter))
    }

    /// Select by every non null field of the record, all rows when none is set.
    fn write_select_many<E: Entity>(&self, mapping: &Mapping, entity: &E) -> Result<Statement>
    where
        Self: Sized,
    {
        let metadata = mapping.metadata::<E>()?;
        let filter = bind_columns(mapping, &metadata, entity, metadata.all_columns(), true)?;
        let mut out = String::with_capacity(128);
        self.write_select_from(&mut out, &metadata);
        if !filter.is_empty() {
            out.push_str(" where ");
            write_filter(self, &mut out, &filter);
        }
        Ok(statement(out, filter))
    }

    fn write_select_by_criteria<E: Entity>(
        &self,
        mapping: &Mapping,
        criteria: &Criteria,
    ) -> Result<Statement>
    where
        Self: Sized,
    {
        let metadata = mapping.metadata::<E>()?;
        let mut out = String::with_capacity(128);
        self.write_select_from(&mut out, &metadata);
        if !criteria.is_empty() {
            out.push_str(" where ");
            self.write_predicates(&mut out, criteria.predicates());
        }
        Ok(Statement {
            text: out,
            params: criteria.params(),
        })
    }
}

/// Dialect with plain identifiers and `?` markers.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {}

fn bind_columns<'a, E: Entity>(
    mapping: &Mapping,
    metadata: &EntityMetadata,
    entity: &E,
    columns: impl Iterator<Item = &'a ColumnMapping>,
    skip_null: bool,
) -> Result<Vec<Bound>> {
    let mut result = Vec::new();
    for column in columns {
        let value = mapping.bind_value(metadata, entity, column)?;
        if skip_null && value.is_null() {
            continue;
        }
        result.push((column.column, value));
    }
    Ok(result)
}

/// Every primary key column, fails when there is none or one of them is null.
fn bind_key<E: Entity>(
    mapping: &Mapping,
    metadata: &EntityMetadata,
    entity: &E,
) -> Result<Vec<Bound>> {
    let filter = bind_columns(mapping, metadata, entity, metadata.primary_key.iter(), false)?;
    if filter.is_empty() || filter.iter().any(|(_, v)| v.is_null()) {
        return Err(OrmError::MissingKey(metadata.table.into()).into());
    }
    Ok(filter)
}

fn write_filter<W: SqlWriter + ?Sized>(writer: &W, out: &mut String, filter: &[Bound]) {
    separated_by(
        out,
        filter,
        |out, (column, _)| writer.write_assignment(out, column),
        " and ",
    );
}

fn write_update<W: SqlWriter + ?Sized>(
    writer: &W,
    metadata: &EntityMetadata,
    set: Vec<Bound>,
    filter: Vec<Bound>,
) -> Statement {
    let mut out = String::with_capacity(128);
    out.push_str("update ");
    writer.write_identifier(&mut out, metadata.table);
    out.push_str(" set ");
    separated_by(
        &mut out,
        &set,
        |out, (column, _)| writer.write_assignment(out, column),
        ", ",
    );
    out.push_str(" where ");
    write_filter(writer, &mut out, &filter);
    statement(out, set.into_iter().chain(filter))
}

fn statement(text: String, values: impl IntoIterator<Item = Bound>) -> Statement {
    Statement {
        text,
        params: values.into_iter().map(|(_, v)| v).collect(),
    }
}
