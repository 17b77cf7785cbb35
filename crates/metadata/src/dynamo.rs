//! DynamoDB-backed file-store table.

use crate::error::{MetadataError, MetadataResult};
use crate::models::FileStoreRow;
use crate::repos::FileStoreRepo;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use tracing::instrument;

const ATTR_TENANT: &str = "tenant-id";
const ATTR_STORE: &str = "store-id";
const ATTR_CLASS: &str = "class";
const ATTR_DATA: &str = "data";

type Item = HashMap<String, AttributeValue>;

fn map_dynamo_error<E>(err: SdkError<E>) -> MetadataError
where
    E: std::error::Error + Send + Sync + 'static,
{
    MetadataError::Dynamo(Box::new(err))
}

fn string_attr(item: &Item, name: &str) -> MetadataResult<String> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| MetadataError::Serialization(format!("item is missing string attribute '{name}'")))
}

fn row_from_item(item: &Item) -> MetadataResult<FileStoreRow> {
    Ok(FileStoreRow {
        tenant_id: string_attr(item, ATTR_TENANT)?,
        store_id: string_attr(item, ATTR_STORE)?,
        class: string_attr(item, ATTR_CLASS)?,
        data: string_attr(item, ATTR_DATA)?,
    })
}

fn key(tenant_id: &str, store_id: &str) -> Item {
    HashMap::from([
        (ATTR_TENANT.to_string(), AttributeValue::S(tenant_id.to_string())),
        (ATTR_STORE.to_string(), AttributeValue::S(store_id.to_string())),
    ])
}

/// DynamoDB table keyed by `tenant-id` (hash) and `store-id` (range), with a
/// local secondary index whose range key is `class`.
pub struct DynamoStore {
    client: Client,
    table: String,
    class_index: String,
}

impl std::fmt::Debug for DynamoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoStore")
            .field("table", &self.table)
            .field("class_index", &self.class_index)
            .finish_non_exhaustive()
    }
}

impl DynamoStore {
    /// Create a store from a shared SDK configuration.
    pub fn new(sdk: &aws_config::SdkConfig, table: &str, class_index: &str) -> Self {
        Self::from_client(Client::new(sdk), table, class_index)
    }

    /// Create a store around an existing client.
    pub fn from_client(client: Client, table: &str, class_index: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            class_index: class_index.to_string(),
        }
    }

    /// Run a query, draining `LastEvaluatedKey` pages unless `limit` caps it.
    async fn query_pages(
        &self,
        index: Option<&str>,
        key_condition: &str,
        names: HashMap<String, String>,
        values: HashMap<String, AttributeValue>,
        limit: Option<usize>,
    ) -> MetadataResult<Vec<FileStoreRow>> {
        let mut rows = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table)
                .key_condition_expression(key_condition)
                .set_expression_attribute_names(Some(names.clone()))
                .set_expression_attribute_values(Some(values.clone()))
                .set_exclusive_start_key(start_key.take());
            if let Some(index) = index {
                request = request.index_name(index);
            }
            if let Some(limit) = limit {
                let remaining = limit.saturating_sub(rows.len());
                request = request.limit(i32::try_from(remaining).unwrap_or(i32::MAX));
            }

            let output = request.send().await.map_err(map_dynamo_error)?;
            for item in output.items() {
                rows.push(row_from_item(item)?);
            }

            if let Some(limit) = limit
                && rows.len() >= limit
            {
                rows.truncate(limit);
                break;
            }

            match output.last_evaluated_key() {
                Some(last) if !last.is_empty() => start_key = Some(last.clone()),
                _ => break,
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl FileStoreRepo for DynamoStore {
    #[instrument(skip(self, row), fields(backend = "dynamodb", tenant_id = %row.tenant_id, file_store_id = %row.store_id))]
    async fn put_file_store(&self, row: &FileStoreRow) -> MetadataResult<()> {
        let mut item = key(&row.tenant_id, &row.store_id);
        item.insert(ATTR_CLASS.to_string(), AttributeValue::S(row.class.clone()));
        item.insert(ATTR_DATA.to_string(), AttributeValue::S(row.data.clone()));

        let result = self
            .client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#tenant) AND attribute_not_exists(#store)")
            .expression_attribute_names("#tenant", ATTR_TENANT)
            .expression_attribute_names("#store", ATTR_STORE)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(MetadataError::AlreadyExists(format!(
                    "file store {}/{}",
                    row.tenant_id, row.store_id
                )))
            }
            Err(err) => Err(map_dynamo_error(err)),
        }
    }

    #[instrument(skip(self, row), fields(backend = "dynamodb", tenant_id = %row.tenant_id, file_store_id = %row.store_id))]
    async fn patch_file_store(&self, row: &FileStoreRow) -> MetadataResult<()> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table)
            .set_key(Some(key(&row.tenant_id, &row.store_id)))
            .update_expression("SET #data = :data")
            .condition_expression("attribute_exists(#store)")
            .expression_attribute_names("#data", ATTR_DATA)
            .expression_attribute_names("#store", ATTR_STORE)
            .expression_attribute_values(":data", AttributeValue::S(row.data.clone()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(MetadataError::ConditionFailed(format!(
                    "file store {}/{} does not exist",
                    row.tenant_id, row.store_id
                )))
            }
            Err(err) => Err(map_dynamo_error(err)),
        }
    }

    #[instrument(skip(self), fields(backend = "dynamodb"))]
    async fn get_file_store(
        &self,
        tenant_id: &str,
        store_id: &str,
    ) -> MetadataResult<Option<FileStoreRow>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(key(tenant_id, store_id)))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_dynamo_error)?;

        output.item().map(row_from_item).transpose()
    }

    #[instrument(skip(self), fields(backend = "dynamodb"))]
    async fn query_by_class(
        &self,
        tenant_id: &str,
        class: &str,
        limit: Option<usize>,
    ) -> MetadataResult<Vec<FileStoreRow>> {
        let names = HashMap::from([
            ("#tenant".to_string(), ATTR_TENANT.to_string()),
            ("#class".to_string(), ATTR_CLASS.to_string()),
        ]);
        let values = HashMap::from([
            (":tenant".to_string(), AttributeValue::S(tenant_id.to_string())),
            (":class".to_string(), AttributeValue::S(class.to_string())),
        ]);
        self.query_pages(
            Some(&self.class_index),
            "#tenant = :tenant AND #class = :class",
            names,
            values,
            limit,
        )
        .await
    }

    #[instrument(skip(self), fields(backend = "dynamodb"))]
    async fn query_by_tenant(&self, tenant_id: &str) -> MetadataResult<Vec<FileStoreRow>> {
        let names = HashMap::from([("#tenant".to_string(), ATTR_TENANT.to_string())]);
        let values = HashMap::from([(
            ":tenant".to_string(),
            AttributeValue::S(tenant_id.to_string()),
        )]);
        self.query_pages(None, "#tenant = :tenant", names, values, None)
            .await
    }

    #[instrument(skip(self), fields(backend = "dynamodb"))]
    async fn delete_file_store(&self, tenant_id: &str, store_id: &str) -> MetadataResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .set_key(Some(key(tenant_id, store_id)))
            .send()
            .await
            .map_err(map_dynamo_error)?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        self.client
            .describe_table()
            .table_name(&self.table)
            .send()
            .await
            .map_err(map_dynamo_error)?;
        Ok(())
    }
}
