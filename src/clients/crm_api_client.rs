//! Cliente HTTP de la API del CRM
//!
//! Encapsula todas las llamadas del núcleo cliente al backend: login,
//! CRUD de registros, listados filtrados, informes de garantía, opciones
//! de filtros y descargas de exportación. Guarda el token bearer tras el
//! login y lo adjunta a cada petición.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::clients::listing::{ListingQuery, RecordPage, RecordSearch};
use crate::controllers::export_controller::ExportFormat;
use crate::dto::auth_dto::{LoginRequest, TokenResponse};
use crate::dto::filter_dto::FilterOptionsResponse;
use crate::dto::record_dto::{
    CreateRecordRequest, RecordListResponse, RecordResponse, UpdateRecordRequest,
};
use crate::dto::sales_dto::SalesSummary;
use crate::dto::warranty_dto::WarrantySummary;
use crate::models::filters::{FilterSet, ListingScope, PageWindow};
use crate::utils::errors::AppError;

/// Qué conjunto de registros exportar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Records,
    Sales,
}

impl ExportKind {
    fn basename(&self) -> &'static str {
        match self {
            ExportKind::Records => "records",
            ExportKind::Sales => "sales",
        }
    }
}

pub struct CrmApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl CrmApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Mapear respuestas de error a la taxonomía de la aplicación
    async fn check_status(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status));

        Err(match status.as_u16() {
            400 => AppError::BadRequest(message),
            401 => AppError::Unauthorized(message),
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            409 => AppError::Conflict(message),
            501 => AppError::NotImplemented(message),
            _ => AppError::BackendApi(message),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<T, AppError> {
        let request = self.http.get(self.url(path, query));
        let response = self.authorized(request).await.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Login por código de acceso; el token queda guardado en el cliente
    pub async fn login(&self, passcode: &str) -> Result<TokenResponse, AppError> {
        let request = LoginRequest {
            passcode: passcode.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/login", ""))
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let token: TokenResponse = response.json().await?;

        self.set_token(token.access_token.clone()).await;
        Ok(token)
    }

    pub async fn logout(&self) {
        self.clear_token().await;
    }

    // ------------------------------------------------------------------
    // Registros (rol mantenimiento)
    // ------------------------------------------------------------------

    pub async fn list_records(
        &self,
        filters: &FilterSet,
        window: &PageWindow,
    ) -> Result<RecordListResponse, AppError> {
        let query = filters.to_query_string(Some(window), ListingScope::MaintenanceRecords);
        self.get_json("/records", &query).await
    }

    pub async fn get_record(&self, id: i64) -> Result<RecordResponse, AppError> {
        self.get_json(&format!("/records/{}", id), "").await
    }

    pub async fn create_record(
        &self,
        request: &CreateRecordRequest,
    ) -> Result<RecordResponse, AppError> {
        let builder = self.http.post(self.url("/records", "")).json(request);
        let response = self.authorized(builder).await.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn update_record(
        &self,
        id: i64,
        request: &UpdateRecordRequest,
    ) -> Result<RecordResponse, AppError> {
        let builder = self
            .http
            .patch(self.url(&format!("/records/{}", id), ""))
            .json(request);
        let response = self.authorized(builder).await.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_record(&self, id: i64) -> Result<(), AppError> {
        let builder = self.http.delete(self.url(&format!("/records/{}", id), ""));
        let response = self.authorized(builder).await.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    pub async fn client_history(
        &self,
        client_phone: &str,
        exclude_id: Option<i64>,
    ) -> Result<RecordListResponse, AppError> {
        let query = match exclude_id {
            Some(id) => format!("exclude_id={}", id),
            None => String::new(),
        };
        self.get_json(
            &format!("/records/history/{}", urlencoding::encode(client_phone)),
            &query,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Garantías
    // ------------------------------------------------------------------

    pub async fn warranty_summary(&self, days: Option<u32>) -> Result<WarrantySummary, AppError> {
        let query = match days {
            Some(days) => format!("days={}", days),
            None => String::new(),
        };
        self.get_json("/records/warranty/summary", &query).await
    }

    pub async fn out_of_warranty(
        &self,
        window: &PageWindow,
    ) -> Result<RecordListResponse, AppError> {
        let query = format!("page={}&page_size={}", window.page, window.page_size);
        self.get_json("/records/warranty/out-of-warranty", &query)
            .await
    }

    pub async fn expiring_soon(
        &self,
        days: Option<u32>,
        window: &PageWindow,
    ) -> Result<RecordListResponse, AppError> {
        let mut query = format!("page={}&page_size={}", window.page, window.page_size);
        if let Some(days) = days {
            query = format!("days={}&{}", days, query);
        }
        self.get_json("/records/warranty/expiring-soon", &query).await
    }

    // ------------------------------------------------------------------
    // Ventas (rol ventas)
    // ------------------------------------------------------------------

    pub async fn sales_records(
        &self,
        filters: &FilterSet,
        window: &PageWindow,
    ) -> Result<RecordListResponse, AppError> {
        let query = filters.to_query_string(Some(window), ListingScope::SalesRecords);
        self.get_json("/sales/records", &query).await
    }

    pub async fn sales_summary(&self, filters: &FilterSet) -> Result<SalesSummary, AppError> {
        let query = filters.to_query_string(None, ListingScope::SalesRecords);
        self.get_json("/sales/summary", &query).await
    }

    // ------------------------------------------------------------------
    // Filtros y exportaciones
    // ------------------------------------------------------------------

    pub async fn filter_options(&self) -> Result<FilterOptionsResponse, AppError> {
        self.get_json("/filters/options", "").await
    }

    /// Descargar una exportación con los filtros activos
    ///
    /// La descarga exige el header bearer; sin sesión el backend contesta 401.
    pub async fn download_export(
        &self,
        kind: ExportKind,
        format: ExportFormat,
        filters: &FilterSet,
    ) -> Result<Vec<u8>, AppError> {
        let query = filters.to_query_string(None, ListingScope::Export);
        let path = format!("/export/{}.{}", kind.basename(), format.extension());

        let request = self.http.get(self.url(&path, &query));
        let response = self.authorized(request).await.send().await?;
        let response = Self::check_status(response).await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Carga inicial del panel de mantenimiento: resumen de garantías y
    /// opciones de filtros en paralelo
    pub async fn bootstrap_maintenance_dashboard(
        &self,
        days: Option<u32>,
    ) -> Result<(WarrantySummary, FilterOptionsResponse), AppError> {
        futures::try_join!(self.warranty_summary(days), self.filter_options())
    }
}

#[async_trait]
impl RecordSearch for CrmApiClient {
    async fn fetch_page(&self, query: &ListingQuery) -> Result<RecordPage, AppError> {
        let response = match query.scope {
            ListingScope::MaintenanceRecords => {
                self.list_records(&query.filters, &query.window).await?
            }
            ListingScope::SalesRecords => {
                self.sales_records(&query.filters, &query.window).await?
            }
            ListingScope::Export => {
                return Err(AppError::BadRequest(
                    "Las exportaciones no se consumen como listado paginado".to_string(),
                ))
            }
        };

        Ok(RecordPage::from(response))
    }
}
