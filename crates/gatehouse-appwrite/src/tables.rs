//! Tables service: row listing and creation.

use gatehouse_core::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::{AppwriteClient, Query, RowList};

/// Row endpoints of the tables database.
#[derive(Clone, Copy, Debug)]
pub struct Tables<'a> {
    client: &'a AppwriteClient,
}

impl<'a> Tables<'a> {
    pub(crate) fn new(client: &'a AppwriteClient) -> Self {
        Self { client }
    }

    /// List rows matching `queries`.
    pub async fn list_rows<T>(
        &self,
        database_id: &str,
        table_id: &str,
        queries: &[Query],
    ) -> Result<RowList<T>>
    where
        T: DeserializeOwned,
    {
        let mut url = self
            .client
            .url(&["tablesdb", database_id, "tables", table_id, "rows"])?;
        {
            let mut pairs = url.query_pairs_mut();
            for query in queries {
                pairs.append_pair("queries[]", &query.to_param());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        self.client
            .send_json("tables.listRows", |http| http.get(url.clone()))
            .await
    }

    /// Create a row with id `row_id` holding `data`.
    pub async fn create_row<D, T>(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: &D,
    ) -> Result<T>
    where
        D: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .client
            .url(&["tablesdb", database_id, "tables", table_id, "rows"])?;
        let body = json!({ "rowId": row_id, "data": serde_json::to_value(data)? });
        self.client
            .send_json("tables.createRow", |http| http.post(url.clone()).json(&body))
            .await
    }
}
