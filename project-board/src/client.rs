use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    domain::{Activity, ActivityFilter, BudgetWindow, NewProject, Project, ProjectId, ProjectPatch},
    ports::ProjectApi,
    BoardError, BoardURL,
};

/// `ProjectApi` over the backend's REST routes (`/project`, `/activity`).
#[derive(Debug, Clone)]
pub struct HttpProjectApi {
    client: Client,
    base_url: BoardURL,
}

impl HttpProjectApi {
    pub fn new(base_url: &str) -> Result<Self, BoardError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BoardError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: BoardURL::parse(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> BoardURL {
        self.base_url.append_path(path)
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, BoardError> {
        tracing::debug!("calling {}", call_name);

        let response = request
            .send()
            .await
            .map_err(|e| BoardError::network(format!("failed to call {call_name}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, call_name, &body))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<ApiResponse<T>, BoardError> {
        let response = self.send(request, call_name).await?;

        response.json::<ApiResponse<T>>().await.map_err(|e| {
            BoardError::Parsing(format!("failed to parse {call_name} response as JSON: {e}"))
        })
    }
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn fetch_projects(&self) -> Result<Vec<Project>, BoardError> {
        let call_name = "GET /project";
        let response: ApiResponse<Vec<Project>> = self
            .fetch(self.client.get(self.endpoint("/project").into_url()), call_name)
            .await?;

        response.into_data(call_name)
    }

    async fn fetch_activities(
        &self,
        project_id: &ProjectId,
        window: &BudgetWindow,
    ) -> Result<Vec<Activity>, BoardError> {
        let call_name = "GET /activity";
        let url = self
            .endpoint("/activity")
            .with_filter(&ActivityFilter::new(project_id, window));

        let response: ApiResponse<Vec<Activity>> = self
            .fetch(self.client.get(url.into_url()), call_name)
            .await?;

        response.into_data(call_name)
    }

    async fn update_project(
        &self,
        id: &ProjectId,
        patch: &ProjectPatch,
    ) -> Result<(), BoardError> {
        let call_name = "PUT /project/:id";
        let url = self.endpoint("/project").append_path(id.as_str());

        let response: ApiResponse<Value> = self
            .fetch(self.client.put(url.into_url()).json(patch), call_name)
            .await?;

        response.into_ok(call_name)
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project, BoardError> {
        let call_name = "POST /project";
        let response: ApiResponse<Project> = self
            .fetch(
                self.client
                    .post(self.endpoint("/project").into_url())
                    .json(project),
                call_name,
            )
            .await?;

        response.into_created(call_name)
    }
}

/// Maps a non-success status to the error it stands for.
pub fn status_error(status: StatusCode, call_name: &str, body: &str) -> BoardError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            BoardError::validation(format!("{call_name} rejected: {body}"))
        }
        _ => BoardError::network(format!("{call_name} returned {status}")),
    }
}

/// The envelope every backend route answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_ok(self, call_name: &str) -> Result<(), BoardError> {
        if self.ok {
            Ok(())
        } else {
            Err(BoardError::network(format!(
                "{call_name} failed: {}",
                self.code.as_deref().unwrap_or("unknown error")
            )))
        }
    }

    /// Like `into_data`, but a refused creation is a validation error carrying the backend code.
    pub fn into_created(self, call_name: &str) -> Result<T, BoardError> {
        if !self.ok {
            return Err(BoardError::validation(
                self.code.unwrap_or_else(|| "project rejected".to_string()),
            ));
        }

        self.into_data(call_name)
    }

    pub fn into_data(self, call_name: &str) -> Result<T, BoardError> {
        if !self.ok {
            return Err(BoardError::network(format!(
                "{call_name} failed: {}",
                self.code.as_deref().unwrap_or("unknown error")
            )));
        }

        self.data
            .ok_or_else(|| BoardError::Parsing(format!("{call_name} response has no data")))
    }
}
