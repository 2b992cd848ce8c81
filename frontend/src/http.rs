use log::debug;
use todo_shared::{
    decode_todos, ApiConfig, ApiError, ApiRequest, NewTodo, Operation, Todo, TodoApi, TodoId,
    TodoUpdate,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, RequestMode, Response};

/// [`TodoApi`] over the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct WebApi {
    config: ApiConfig,
}

impl WebApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Sends `request` and returns the response once its status is the one the
    /// operation expects.
    async fn send(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let operation = request.operation();

        let opts = RequestInit::new();
        opts.set_method(request.method().as_str());
        opts.set_mode(RequestMode::Cors);
        if let Some(fields) = request.form() {
            let form = FormData::new().map_err(|e| transport(operation, e))?;
            for (name, value) in &fields {
                form.append_with_str(name, value)
                    .map_err(|e| transport(operation, e))?;
            }
            opts.set_body(&form);
        }

        let url = request.url(&self.config);
        let fetch_request =
            Request::new_with_str_and_init(&url, &opts).map_err(|e| transport(operation, e))?;

        let window = web_sys::window().ok_or_else(|| ApiError::Transport {
            operation,
            message: "no window".to_string(),
        })?;

        let response: Response = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(|e| transport(operation, e))?
            .into();

        debug!("{} {} -> {}", request.method().as_str(), url, response.status());
        operation.check_status(response.status())?;
        Ok(response)
    }
}

impl TodoApi for WebApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(&ApiRequest::List).await?;

        let text_promise = response
            .text()
            .map_err(|e| transport(Operation::List, e))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| transport(Operation::List, e))?
            .as_string()
            .ok_or_else(|| ApiError::Decode {
                operation: Operation::List,
                message: "body is not text".to_string(),
            })?;

        decode_todos(&text).map_err(|e| ApiError::Decode {
            operation: Operation::List,
            message: e.to_string(),
        })
    }

    async fn create(&self, new_todo: &NewTodo) -> Result<(), ApiError> {
        self.send(&ApiRequest::Create(new_todo.clone())).await?;
        Ok(())
    }

    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<(), ApiError> {
        self.send(&ApiRequest::Update(id.clone(), update.clone()))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        self.send(&ApiRequest::Delete(id.clone())).await?;
        Ok(())
    }
}

fn transport(operation: Operation, err: JsValue) -> ApiError {
    ApiError::Transport {
        operation,
        message: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}
