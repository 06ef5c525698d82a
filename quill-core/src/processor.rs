use crate::{
    AsValue, Context, Cursor, Entity, EntityDescriptor, FieldDef, Mapping, OrmError, Result,
    RowMap, Value,
};
use std::{collections::HashMap, hash::Hash, marker::PhantomData};

/// Field of the entity each cursor column is written into, `None` for unmapped columns.
pub type FieldIndices = Box<[Option<usize>]>;

/// Converts cursor rows into entities, maps and value lists.
///
/// Columns are correlated with fields by label: first the explicit overrides,
/// then the field name, then the declared column name, and finally the field
/// name ignoring case. Columns matching none of them are skipped.
#[derive(Debug, Clone, Default)]
pub struct RowProcessor {
    mapping: Mapping,
    overrides: HashMap<String, String>,
}

impl RowProcessor {
    pub fn new(mapping: Mapping) -> Self {
        Self {
            mapping,
            overrides: HashMap::new(),
        }
    }

    /// Column `column` (case insensitive) is always written into field `field`.
    pub fn with_override(mut self, column: impl AsRef<str>, field: impl Into<String>) -> Self {
        self.overrides
            .insert(column.as_ref().to_lowercase(), field.into());
        self
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Resolves every column of `cursor` to a field of `E`.
    pub fn field_indices<E: Entity>(&self, cursor: &impl Cursor) -> Result<FieldIndices> {
        let metadata = self.mapping.metadata::<E>()?;
        let descriptor = E::descriptor();
        let position = |name: &str| descriptor.fields.iter().position(|f| f.name == name);
        (0..cursor.column_count())
            .map(|i| -> Result<Option<usize>> {
                let label = column_key(cursor, i);
                if let Some(field) = self.overrides.get(&label.to_lowercase()) {
                    return match position(field.as_str()) {
                        Some(index) => Ok(Some(index)),
                        None => Err(OrmError::Mapping(format!(
                            "column `{label}` is overridden to `{field}`, which is not a field of `{}`",
                            descriptor.name
                        ))
                        .into()),
                    };
                }
                let index = position(label)
                    .or_else(|| metadata.by_column(label).map(|v| v.index))
                    .or_else(|| {
                        descriptor
                            .fields
                            .iter()
                            .position(|f| f.name.eq_ignore_ascii_case(label))
                    });
                if index.is_none() {
                    log::trace!(
                        "Column `{label}` does not map to any field of `{}`, skipped",
                        descriptor.name
                    );
                }
                Ok(index)
            })
            .collect()
    }

    /// Writes the current row into `entity`.
    ///
    /// Either every mapped field is assigned or, on error, `entity` is left untouched.
    pub fn populate<E: Entity>(&self, cursor: &impl Cursor, entity: &mut E) -> Result<()> {
        let fields = self.field_indices::<E>(cursor)?;
        let values = self.coerce_row::<E>(cursor, &fields)?;
        // Dry run, a failing assignment must not reach `entity`
        assign(&mut E::default(), values.iter().cloned())?;
        assign(entity, values)
    }

    /// Coerced value of every mapped column of the current row.
    fn coerce_row<E: Entity>(
        &self,
        cursor: &impl Cursor,
        fields: &[Option<usize>],
    ) -> Result<Vec<(&'static FieldDef, Value)>> {
        let EntityDescriptor {
            fields: defs, ..
        } = E::descriptor();
        let coercion = &self.mapping.coercion;
        let mut result = Vec::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            let Some(field) = field.and_then(|index| defs.get(index)) else {
                continue;
            };
            let value = coercion.incoming(cursor.value(i)?, field)?;
            let value = coercion.outgoing(value, field)?;
            result.push((field, value));
        }
        Ok(result)
    }

    fn build<E: Entity>(&self, cursor: &impl Cursor, fields: &[Option<usize>]) -> Result<E> {
        let mut entity = E::default();
        assign(&mut entity, self.coerce_row::<E>(cursor, fields)?)?;
        Ok(entity)
    }

    /// Entity from the next row, `None` when the cursor is exhausted.
    pub fn to_record<E: Entity>(&self, cursor: &mut impl Cursor) -> Result<Option<E>> {
        if !cursor.advance()? {
            return Ok(None);
        }
        let fields = self.field_indices::<E>(cursor)?;
        self.build(cursor, &fields).map(Some)
    }

    /// Entities from all the remaining rows, the column correlation is computed once.
    pub fn to_record_list<E: Entity>(&self, cursor: &mut impl Cursor) -> Result<Vec<E>> {
        if !cursor.advance()? {
            return Ok(Vec::new());
        }
        let fields = self.field_indices::<E>(cursor)?;
        let mut result = Vec::new();
        loop {
            result.push(self.build(cursor, &fields)?);
            if !cursor.advance()? {
                break;
            }
        }
        Ok(result)
    }

    /// Lazy version of [`RowProcessor::to_record_list`].
    pub fn records<E: Entity, C: Cursor>(&self, cursor: C) -> Records<E, C> {
        Records {
            processor: self.clone(),
            cursor,
            fields: None,
            done: false,
            _entity: PhantomData,
        }
    }

    /// Current row keyed by column label, or by column name when the label is empty.
    pub fn to_row(&self, cursor: &impl Cursor) -> Result<RowMap> {
        let mut result = RowMap::with_capacity(cursor.column_count());
        for i in 0..cursor.column_count() {
            result.insert(column_key(cursor, i), cursor.value(i)?);
        }
        Ok(result)
    }

    /// Current row, one value per column in column order.
    pub fn to_values(&self, cursor: &impl Cursor) -> Result<Vec<Value>> {
        (0..cursor.column_count()).map(|i| cursor.value(i)).collect()
    }

    pub fn to_row_list(&self, cursor: &mut impl Cursor) -> Result<Vec<RowMap>> {
        let mut result = Vec::new();
        while cursor.advance()? {
            result.push(self.to_row(cursor)?);
        }
        Ok(result)
    }

    pub fn to_values_list(&self, cursor: &mut impl Cursor) -> Result<Vec<Vec<Value>>> {
        let mut result = Vec::new();
        while cursor.advance()? {
            result.push(self.to_values(cursor)?);
        }
        Ok(result)
    }

    /// Column `index` of the next row.
    pub fn scalar(&self, cursor: &mut impl Cursor, index: usize) -> Result<Option<Value>> {
        if !cursor.advance()? {
            return Ok(None);
        }
        cursor.value(index).map(Some)
    }

    /// Column labeled `label` (case insensitive) of the next row.
    pub fn scalar_by_label(&self, cursor: &mut impl Cursor, label: &str) -> Result<Option<Value>> {
        let index = column_position(cursor, label)?;
        self.scalar(cursor, index)
    }

    /// Column `index` of all the remaining rows.
    pub fn column_list(&self, cursor: &mut impl Cursor, index: usize) -> Result<Vec<Value>> {
        let mut result = Vec::new();
        while cursor.advance()? {
            result.push(cursor.value(index)?);
        }
        Ok(result)
    }

    /// Column labeled `label` (case insensitive) of all the remaining rows.
    pub fn column_list_by_label(
        &self,
        cursor: &mut impl Cursor,
        label: &str,
    ) -> Result<Vec<Value>> {
        let index = column_position(cursor, label)?;
        self.column_list(cursor, index)
    }

    /// Remaining rows keyed by the value of column `key`, a later row replaces
    /// an earlier one with the same key.
    pub fn to_keyed_rows<K: AsValue + Eq + Hash>(
        &self,
        cursor: &mut impl Cursor,
        key: impl Into<ColumnKey>,
    ) -> Result<HashMap<K, RowMap>> {
        let index = key.into().position(cursor)?;
        let mut result = HashMap::new();
        while cursor.advance()? {
            result.insert(row_key(cursor, index)?, self.to_row(cursor)?);
        }
        Ok(result)
    }

    /// Entities from all the remaining rows keyed by the value of column `key`.
    ///
    /// Same column correlation as [`RowProcessor::to_record_list`], a later
    /// row replaces an earlier one with the same key.
    pub fn to_record_map<E: Entity, K: AsValue + Eq + Hash>(
        &self,
        cursor: &mut impl Cursor,
        key: impl Into<ColumnKey>,
    ) -> Result<HashMap<K, E>> {
        let index = key.into().position(cursor)?;
        let mut result = HashMap::new();
        if !cursor.advance()? {
            return Ok(result);
        }
        let fields = self.field_indices::<E>(cursor)?;
        loop {
            result.insert(row_key(cursor, index)?, self.build(cursor, &fields)?);
            if !cursor.advance()? {
                break;
            }
        }
        Ok(result)
    }
}

/// Column of a result, by position or by label ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKey {
    Index(usize),
    Label(String),
}

impl ColumnKey {
    /// Position of the column in `cursor`.
    pub fn position(&self, cursor: &impl Cursor) -> Result<usize> {
        match self {
            ColumnKey::Index(index) if *index < cursor.column_count() => Ok(*index),
            ColumnKey::Index(index) => Err(OrmError::Mapping(format!(
                "column index {index} is out of range, the result has {} columns",
                cursor.column_count()
            ))
            .into()),
            ColumnKey::Label(label) => column_position(cursor, label),
        }
    }
}

impl From<usize> for ColumnKey {
    fn from(value: usize) -> Self {
        ColumnKey::Index(value)
    }
}

impl From<&str> for ColumnKey {
    fn from(value: &str) -> Self {
        ColumnKey::Label(value.into())
    }
}

impl From<String> for ColumnKey {
    fn from(value: String) -> Self {
        ColumnKey::Label(value)
    }
}

fn assign<E: Entity>(
    entity: &mut E,
    values: impl IntoIterator<Item = (&'static FieldDef, Value)>,
) -> Result<()> {
    for (field, value) in values {
        entity.set_field(field.name, value)?;
    }
    Ok(())
}

fn row_key<K: AsValue>(cursor: &impl Cursor, index: usize) -> Result<K> {
    K::try_from_value(cursor.value(index)?).with_context(|| {
        OrmError::Mapping(format!(
            "column `{}` cannot be used as a key",
            column_key(cursor, index)
        ))
    })
}

fn column_key(cursor: &impl Cursor, index: usize) -> &str {
    let label = cursor.column_label(index);
    if label.is_empty() {
        cursor.column_name(index)
    } else {
        label
    }
}

fn column_position(cursor: &impl Cursor, label: &str) -> Result<usize> {
    (0..cursor.column_count())
        .position(|i| column_key(cursor, i).eq_ignore_ascii_case(label))
        .ok_or_else(|| OrmError::Mapping(format!("the result has no column `{label}`")).into())
}

/// Iterator over the entities of a cursor, see [`RowProcessor::records`].
///
/// It stops after the first error.
pub struct Records<E, C> {
    processor: RowProcessor,
    cursor: C,
    fields: Option<FieldIndices>,
    done: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, C: Cursor> Records<E, C> {
    fn next_record(&mut self) -> Result<Option<E>> {
        if !self.cursor.advance()? {
            return Ok(None);
        }
        let fields = match self.fields.take() {
            Some(fields) => fields,
            None => self.processor.field_indices::<E>(&self.cursor)?,
        };
        let result = self.processor.build(&self.cursor, &fields);
        self.fields = Some(fields);
        result.map(Some)
    }
}

impl<E: Entity, C: Cursor> Iterator for Records<E, C> {
    type Item = Result<E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_record().transpose();
        if !matches!(result, Some(Ok(..))) {
            self.done = true;
        }
        result
    }
}
