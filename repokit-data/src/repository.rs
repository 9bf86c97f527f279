//! Generic repositories over a [`Store`].
//!
//! Every operation takes a sparse *condition record*: an instance of any
//! [`Record`] whose non-default fields describe what to match. Range and
//! comparison finds locate their column from the single non-default field of
//! the right kind, so a condition like `User { birthday: mark::target_time(),
//! ..Default::default() }` selects the `birthday` column.
//!
//! # Example
//!
//! ```ignore
//! let repo = UltimateRepository::<User, i64, _>::new(store);
//! let cancel = CancellationToken::new();
//!
//! let adults = repo
//!     .find_compare(&cancel, &User { age: 1, ..Default::default() }, 18, Operator::Gte, -1)
//!     .await?;
//! let page = repo.p_find_all(&cancel, Pageable::new(1, 20)).await?;
//! ```

use std::future::Future;
use std::marker::PhantomData;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{DataError, DataResult};
use crate::filter::Filter;
use crate::introspect::{non_default_fields, resolve_primary_key};
use crate::page::{Pageable, Pagination};
use crate::query::{Condition, IdentifierPolicy, Operator, QueryBuilder};
use crate::record::{describe, flatten, primary_key_column, soft_delete_column, Entity, Record};
use crate::store::Store;
use crate::value::{FieldValue, Identifier, Number, Timestamp, Value, ValueKind};

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

/// CRUD, pattern, range and comparison operations.
///
/// A `limit` of `-1` (any negative value) means unbounded.
pub trait Basic<T, Id>: Send + Sync
where
    T: Entity + Send + 'static,
    Id: Identifier,
{
    /// Insert `entity` and replace it with the stored row.
    fn create(
        &self,
        cancel: &CancellationToken,
        entity: &mut T,
    ) -> impl Future<Output = DataResult<()>> + Send;

    /// Upsert by primary key: an unset key inserts, otherwise every
    /// non-default field is written. Returns rows affected.
    fn update(
        &self,
        cancel: &CancellationToken,
        entity: &mut T,
    ) -> impl Future<Output = DataResult<u64>> + Send;

    /// Delete by the entity's primary key. Returns rows affected.
    fn delete(
        &self,
        cancel: &CancellationToken,
        entity: &T,
    ) -> impl Future<Output = DataResult<u64>> + Send;

    fn delete_by_id(
        &self,
        cancel: &CancellationToken,
        id: Id,
    ) -> impl Future<Output = DataResult<u64>> + Send;

    /// First row matching every non-default field of `condition`.
    fn get_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
    ) -> impl Future<Output = DataResult<T>> + Send;

    fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: Id,
    ) -> impl Future<Output = DataResult<T>> + Send;

    fn find_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send;

    fn find_all(
        &self,
        cancel: &CancellationToken,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send;

    /// `LIKE` on every non-default text field of `condition`.
    fn like<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send;

    fn find_before<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        before: Timestamp,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send;

    fn find_after<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        after: Timestamp,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send;

    /// Both bounds exclusive.
    fn find_between<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        start: Timestamp,
        end: Timestamp,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send;

    /// `column <op> value` on the single non-default field of `N`'s kind.
    fn find_compare<C: Record + ?Sized, N: Number>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        value: N,
        op: Operator,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send;
}

/// Paginated counterparts of the [`Basic`] finders.
pub trait Paginated<T, Id>: Send + Sync
where
    T: Entity + Send + 'static,
    Id: Identifier,
{
    fn p_find_all(
        &self,
        cancel: &CancellationToken,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send;

    fn p_find_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send;

    fn p_like<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send;

    fn p_find_before<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        before: Timestamp,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send;

    fn p_find_after<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        after: Timestamp,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send;

    fn p_find_between<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        start: Timestamp,
        end: Timestamp,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send;

    fn p_find_compare<C: Record + ?Sized, N: Number>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        value: N,
        op: Operator,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send;
}

/// Both capability sets.
pub trait Ultimate<T, Id>: Basic<T, Id> + Paginated<T, Id>
where
    T: Entity + Send + 'static,
    Id: Identifier,
{
}

impl<R, T, Id> Ultimate<T, Id> for R
where
    R: Basic<T, Id> + Paginated<T, Id>,
    T: Entity + Send + 'static,
    Id: Identifier,
{
}

/// Table-level plumbing shared by the repositories.
struct Scope<T, S> {
    store: S,
    eager: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S: Clone> Clone for Scope<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            eager: self.eager,
            _marker: PhantomData,
        }
    }
}

impl<T, S> Scope<T, S>
where
    T: Entity + Send + 'static,
    S: Store<T>,
{
    fn new(store: S, eager: bool) -> Self {
        Self {
            store,
            eager,
            _marker: PhantomData,
        }
    }

    /// Identifiers are always quoted: column names may be SQL keywords.
    fn builder(&self) -> QueryBuilder {
        QueryBuilder::new_with_dialect(T::table_name(), self.store.dialect())
            .identifier_policy(IdentifierPolicy::Quote)
    }

    /// Builder restricted to rows that are not soft-deleted.
    fn live(&self) -> QueryBuilder {
        match soft_delete_column::<T>() {
            Some(column) => self.builder().where_null(&column),
            None => self.builder(),
        }
    }

    async fn fetch(
        &self,
        cancel: &CancellationToken,
        filter: &Filter,
        limit: i64,
        offset: i64,
    ) -> DataResult<Vec<T>> {
        let stmt = self
            .live()
            .filter(filter)
            .order_by(&primary_key_column::<T>(), true)
            .limit(limit)
            .offset(offset)
            .build_select(&["*"])?;
        let mut rows = self.store.fetch_all(cancel, stmt).await?;
        if self.eager {
            self.store.preload(cancel, &mut rows).await?;
        }
        Ok(rows)
    }

    async fn first(&self, cancel: &CancellationToken, filter: &Filter) -> DataResult<T> {
        let stmt = self
            .live()
            .filter(filter)
            .order_by(&primary_key_column::<T>(), true)
            .limit(1)
            .build_select(&["*"])?;
        let mut row = self.store.fetch_one(cancel, stmt).await?;
        if self.eager {
            self.store
                .preload(cancel, std::slice::from_mut(&mut row))
                .await?;
        }
        Ok(row)
    }

    /// Live rows in the whole table; page filters do not narrow the total.
    async fn count(&self, cancel: &CancellationToken) -> DataResult<i64> {
        let stmt = self.live().build_count()?;
        self.store.fetch_count(cancel, stmt).await
    }

    async fn page(
        &self,
        cancel: &CancellationToken,
        filter: &Filter,
        pageable: Pageable,
    ) -> DataResult<Pagination<T>> {
        let rows = self
            .fetch(cancel, filter, pageable.size, pageable.offset())
            .await?;
        let total = self.count(cancel).await?;
        Ok(Pagination::new(rows, pageable, total))
    }

    /// Hard delete, or stamp the soft-delete column when the table has one.
    async fn remove(&self, cancel: &CancellationToken, column: &str, id: Value) -> DataResult<u64> {
        let by_id = self.builder().where_eq(column, id);
        let stmt = match soft_delete_column::<T>() {
            Some(deleted_at) => by_id
                .where_null(&deleted_at)
                .build_update(&[(deleted_at.clone(), Value::DeletedAt(Some(Utc::now())))])?,
            None => by_id.build_delete()?,
        };
        self.store.execute(cancel, stmt).await
    }
}

/// Whether `T` has a timestamp column named `column`.
fn has_timestamp_column<T: Entity>(column: &str) -> bool {
    describe::<T>()
        .iter()
        .any(|d| d.kind == ValueKind::Timestamp && d.column_name() == column)
}

fn missing_primary_key<T: Entity>() -> DataError {
    DataError::MissingPrimaryKey {
        table: T::table_name().to_string(),
    }
}

/// [`Basic`] over any [`Store`].
pub struct BasicRepository<T, Id, S> {
    scope: Scope<T, S>,
    _id: PhantomData<fn() -> Id>,
}

impl<T, Id, S: Clone> Clone for BasicRepository<T, Id, S> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            _id: PhantomData,
        }
    }
}

impl<T, Id, S> BasicRepository<T, Id, S>
where
    T: Entity + Send + 'static,
    Id: Identifier,
    S: Store<T>,
{
    pub fn new(store: S) -> Self {
        Self {
            scope: Scope::new(store, false),
            _id: PhantomData,
        }
    }

    /// Preload associations of every fetched row.
    pub fn eager(store: S) -> Self {
        Self {
            scope: Scope::new(store, true),
            _id: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.scope.store
    }
}

impl<T, Id, S> Basic<T, Id> for BasicRepository<T, Id, S>
where
    T: Entity + Send + 'static,
    Id: Identifier,
    S: Store<T>,
{
    async fn create(&self, cancel: &CancellationToken, entity: &mut T) -> DataResult<()> {
        debug!(table = T::table_name(), "create");
        let pk_column = primary_key_column::<T>();
        let now = Utc::now();
        let values: Vec<(String, Value)> = flatten(&*entity)
            .into_iter()
            .filter_map(|field| {
                let column = field.descriptor.column_name();
                if !field.zero {
                    return Some((column, field.value));
                }
                if column == pk_column {
                    return None;
                }
                if field.descriptor.kind == ValueKind::Timestamp
                    && (column == CREATED_AT || column == UPDATED_AT)
                {
                    return Some((column, Value::Timestamp(now)));
                }
                Some((column, field.value))
            })
            .collect();

        let stmt = self.scope.builder().build_insert(&values)?;
        *entity = self.scope.store.execute_returning(cancel, stmt).await?;
        Ok(())
    }

    async fn update(&self, cancel: &CancellationToken, entity: &mut T) -> DataResult<u64> {
        let pk = match resolve_primary_key(&*entity) {
            Some(pk) if !pk.zero => pk,
            _ => {
                self.create(cancel, entity).await?;
                return Ok(1);
            }
        };
        debug!(table = T::table_name(), id = %pk.value, "update");

        let mut assignments: Vec<(String, Value)> = non_default_fields(&*entity)
            .into_iter()
            .filter(|f| f.column_name != pk.column_name && f.column_name != UPDATED_AT)
            .map(|f| (f.column_name, f.value))
            .collect();
        if has_timestamp_column::<T>(UPDATED_AT) {
            assignments.push((UPDATED_AT.to_string(), Value::Timestamp(Utc::now())));
        }

        let stmt = self
            .scope
            .live()
            .where_eq(&pk.column_name, pk.value)
            .build_update_returning(&assignments)?;
        *entity = self.scope.store.execute_returning(cancel, stmt).await?;
        Ok(1)
    }

    async fn delete(&self, cancel: &CancellationToken, entity: &T) -> DataResult<u64> {
        let pk = resolve_primary_key(entity)
            .filter(|pk| !pk.zero)
            .ok_or_else(missing_primary_key::<T>)?;
        debug!(table = T::table_name(), id = %pk.value, "delete");
        self.scope.remove(cancel, &pk.column_name, pk.value).await
    }

    async fn delete_by_id(&self, cancel: &CancellationToken, id: Id) -> DataResult<u64> {
        if id.is_zero() {
            return Err(missing_primary_key::<T>());
        }
        let id = id.to_value();
        debug!(table = T::table_name(), id = %id, "delete_by_id");
        self.scope
            .remove(cancel, &primary_key_column::<T>(), id)
            .await
    }

    async fn get_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
    ) -> DataResult<T> {
        self.scope.first(cancel, &Filter::equality(condition)).await
    }

    async fn get_by_id(&self, cancel: &CancellationToken, id: Id) -> DataResult<T> {
        let filter = Filter::all().and(Condition::Eq(primary_key_column::<T>(), id.to_value()));
        self.scope.first(cancel, &filter).await
    }

    async fn find_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        limit: i64,
    ) -> DataResult<Vec<T>> {
        self.scope
            .fetch(cancel, &Filter::equality(condition), limit, 0)
            .await
    }

    async fn find_all(&self, cancel: &CancellationToken, limit: i64) -> DataResult<Vec<T>> {
        self.scope.fetch(cancel, &Filter::all(), limit, 0).await
    }

    async fn like<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        limit: i64,
    ) -> DataResult<Vec<T>> {
        self.scope
            .fetch(cancel, &Filter::pattern(condition), limit, 0)
            .await
    }

    async fn find_before<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        before: Timestamp,
        limit: i64,
    ) -> DataResult<Vec<T>> {
        let filter = Filter::before(condition, before)?;
        self.scope.fetch(cancel, &filter, limit, 0).await
    }

    async fn find_after<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        after: Timestamp,
        limit: i64,
    ) -> DataResult<Vec<T>> {
        let filter = Filter::after(condition, after)?;
        self.scope.fetch(cancel, &filter, limit, 0).await
    }

    async fn find_between<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        start: Timestamp,
        end: Timestamp,
        limit: i64,
    ) -> DataResult<Vec<T>> {
        let filter = Filter::between(condition, start, end)?;
        self.scope.fetch(cancel, &filter, limit, 0).await
    }

    async fn find_compare<C: Record + ?Sized, N: Number>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        value: N,
        op: Operator,
        limit: i64,
    ) -> DataResult<Vec<T>> {
        let filter = Filter::compare(condition, value, op)?;
        self.scope.fetch(cancel, &filter, limit, 0).await
    }
}

/// [`Paginated`] over any [`Store`].
///
/// Each call runs the page query and a `COUNT(*)` over every live row.
pub struct PaginationRepository<T, Id, S> {
    scope: Scope<T, S>,
    _id: PhantomData<fn() -> Id>,
}

impl<T, Id, S: Clone> Clone for PaginationRepository<T, Id, S> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            _id: PhantomData,
        }
    }
}

impl<T, Id, S> PaginationRepository<T, Id, S>
where
    T: Entity + Send + 'static,
    Id: Identifier,
    S: Store<T>,
{
    pub fn new(store: S) -> Self {
        Self {
            scope: Scope::new(store, false),
            _id: PhantomData,
        }
    }

    pub fn eager(store: S) -> Self {
        Self {
            scope: Scope::new(store, true),
            _id: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.scope.store
    }
}

impl<T, Id, S> Paginated<T, Id> for PaginationRepository<T, Id, S>
where
    T: Entity + Send + 'static,
    Id: Identifier,
    S: Store<T>,
{
    async fn p_find_all(
        &self,
        cancel: &CancellationToken,
        pageable: Pageable,
    ) -> DataResult<Pagination<T>> {
        self.scope.page(cancel, &Filter::all(), pageable).await
    }

    async fn p_find_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        pageable: Pageable,
    ) -> DataResult<Pagination<T>> {
        self.scope
            .page(cancel, &Filter::equality(condition), pageable)
            .await
    }

    async fn p_like<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        pageable: Pageable,
    ) -> DataResult<Pagination<T>> {
        self.scope
            .page(cancel, &Filter::pattern(condition), pageable)
            .await
    }

    async fn p_find_before<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        before: Timestamp,
        pageable: Pageable,
    ) -> DataResult<Pagination<T>> {
        let filter = Filter::before(condition, before)?;
        self.scope.page(cancel, &filter, pageable).await
    }

    async fn p_find_after<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        after: Timestamp,
        pageable: Pageable,
    ) -> DataResult<Pagination<T>> {
        let filter = Filter::after(condition, after)?;
        self.scope.page(cancel, &filter, pageable).await
    }

    async fn p_find_between<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        start: Timestamp,
        end: Timestamp,
        pageable: Pageable,
    ) -> DataResult<Pagination<T>> {
        let filter = Filter::between(condition, start, end)?;
        self.scope.page(cancel, &filter, pageable).await
    }

    async fn p_find_compare<C: Record + ?Sized, N: Number>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        value: N,
        op: Operator,
        pageable: Pageable,
    ) -> DataResult<Pagination<T>> {
        let filter = Filter::compare(condition, value, op)?;
        self.scope.page(cancel, &filter, pageable).await
    }
}

/// [`Basic`] and [`Paginated`] in one value, by delegation.
pub struct UltimateRepository<T, Id, S> {
    basic: BasicRepository<T, Id, S>,
    paginated: PaginationRepository<T, Id, S>,
}

impl<T, Id, S: Clone> Clone for UltimateRepository<T, Id, S> {
    fn clone(&self) -> Self {
        Self {
            basic: self.basic.clone(),
            paginated: self.paginated.clone(),
        }
    }
}

impl<T, Id, S> UltimateRepository<T, Id, S>
where
    T: Entity + Send + 'static,
    Id: Identifier,
    S: Store<T> + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            basic: BasicRepository::new(store.clone()),
            paginated: PaginationRepository::new(store),
        }
    }

    pub fn eager(store: S) -> Self {
        Self {
            basic: BasicRepository::eager(store.clone()),
            paginated: PaginationRepository::eager(store),
        }
    }

    pub fn basic(&self) -> &BasicRepository<T, Id, S> {
        &self.basic
    }

    pub fn paginated(&self) -> &PaginationRepository<T, Id, S> {
        &self.paginated
    }
}

impl<T, Id, S> Basic<T, Id> for UltimateRepository<T, Id, S>
where
    T: Entity + Send + 'static,
    Id: Identifier,
    S: Store<T>,
{
    fn create(
        &self,
        cancel: &CancellationToken,
        entity: &mut T,
    ) -> impl Future<Output = DataResult<()>> + Send {
        self.basic.create(cancel, entity)
    }

    fn update(
        &self,
        cancel: &CancellationToken,
        entity: &mut T,
    ) -> impl Future<Output = DataResult<u64>> + Send {
        self.basic.update(cancel, entity)
    }

    fn delete(
        &self,
        cancel: &CancellationToken,
        entity: &T,
    ) -> impl Future<Output = DataResult<u64>> + Send {
        self.basic.delete(cancel, entity)
    }

    fn delete_by_id(
        &self,
        cancel: &CancellationToken,
        id: Id,
    ) -> impl Future<Output = DataResult<u64>> + Send {
        self.basic.delete_by_id(cancel, id)
    }

    fn get_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
    ) -> impl Future<Output = DataResult<T>> + Send {
        self.basic.get_by(cancel, condition)
    }

    fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: Id,
    ) -> impl Future<Output = DataResult<T>> + Send {
        self.basic.get_by_id(cancel, id)
    }

    fn find_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send {
        self.basic.find_by(cancel, condition, limit)
    }

    fn find_all(
        &self,
        cancel: &CancellationToken,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send {
        self.basic.find_all(cancel, limit)
    }

    fn like<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send {
        self.basic.like(cancel, condition, limit)
    }

    fn find_before<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        before: Timestamp,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send {
        self.basic.find_before(cancel, condition, before, limit)
    }

    fn find_after<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        after: Timestamp,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send {
        self.basic.find_after(cancel, condition, after, limit)
    }

    fn find_between<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        start: Timestamp,
        end: Timestamp,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send {
        self.basic.find_between(cancel, condition, start, end, limit)
    }

    fn find_compare<C: Record + ?Sized, N: Number>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        value: N,
        op: Operator,
        limit: i64,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send {
        self.basic.find_compare(cancel, condition, value, op, limit)
    }
}

impl<T, Id, S> Paginated<T, Id> for UltimateRepository<T, Id, S>
where
    T: Entity + Send + 'static,
    Id: Identifier,
    S: Store<T>,
{
    fn p_find_all(
        &self,
        cancel: &CancellationToken,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send {
        self.paginated.p_find_all(cancel, pageable)
    }

    fn p_find_by<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send {
        self.paginated.p_find_by(cancel, condition, pageable)
    }

    fn p_like<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send {
        self.paginated.p_like(cancel, condition, pageable)
    }

    fn p_find_before<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        before: Timestamp,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send {
        self.paginated.p_find_before(cancel, condition, before, pageable)
    }

    fn p_find_after<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        after: Timestamp,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send {
        self.paginated.p_find_after(cancel, condition, after, pageable)
    }

    fn p_find_between<C: Record + ?Sized>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        start: Timestamp,
        end: Timestamp,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send {
        self.paginated
            .p_find_between(cancel, condition, start, end, pageable)
    }

    fn p_find_compare<C: Record + ?Sized, N: Number>(
        &self,
        cancel: &CancellationToken,
        condition: &C,
        value: N,
        op: Operator,
        pageable: Pageable,
    ) -> impl Future<Output = DataResult<Pagination<T>>> + Send {
        self.paginated
            .p_find_compare(cancel, condition, value, op, pageable)
    }
}
