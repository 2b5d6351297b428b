use crate::action::{handle, Action, Outcome};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::{JsonFileStorage, Storage};
use log::{error, info, warn};
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::{StatusCode, Uri};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Form body of `POST /add`
#[derive(Debug, Deserialize)]
pub struct NewPostForm {
    pub author: String,
    pub title: String,
    pub content: String,
}

/// Form body of `POST /update/<id>`
#[derive(Debug, Deserialize)]
pub struct UpdatePostForm {
    pub title: String,
    pub content: String,
}

/// All post routes over `storage`.
///
/// | Route                | Action          |
/// |----------------------|-----------------|
/// | `GET /`              | list            |
/// | `POST /add`          | create          |
/// | `GET /update/<id>`   | show edit form  |
/// | `POST /update/<id>`  | submit edit     |
/// | `GET /delete/<id>`   | delete          |
/// | `GET /like/<id>`     | like            |
///
/// The storage is shared without a lock: concurrent requests race on the
/// whole document and the last save wins.
pub fn routes<S>(storage: Arc<S>) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone
where
    S: Storage + Send + Sync + 'static,
{
    let list = warp::path::end().and(warp::get()).map(|| Action::List);

    let create = warp::path!("add")
        .and(warp::post())
        .and(warp::body::form())
        .map(|form: NewPostForm| Action::Create {
            author: form.author,
            title: form.title,
            content: form.content,
        });

    let show_update_form = warp::path!("update" / u64)
        .and(warp::get())
        .map(|id: u64| Action::ShowUpdateForm { id });

    let submit_update = warp::path!("update" / u64)
        .and(warp::post())
        .and(warp::body::form())
        .map(|id: u64, form: UpdatePostForm| Action::SubmitUpdate {
            id,
            title: form.title,
            content: form.content,
        });

    let delete = warp::path!("delete" / u64)
        .and(warp::get())
        .map(|id: u64| Action::Delete { id });

    let like = warp::path!("like" / u64)
        .and(warp::get())
        .map(|id: u64| Action::Like { id });

    list.or(create)
        .unify()
        .or(show_update_form)
        .unify()
        .or(submit_update)
        .unify()
        .or(delete)
        .unify()
        .or(like)
        .unify()
        .and(with_storage(storage))
        .and_then(dispatch::<S>)
}

fn with_storage<S>(storage: Arc<S>) -> impl Filter<Extract = (Arc<S>,), Error = Infallible> + Clone
where
    S: Storage + Send + Sync + 'static,
{
    warp::any().map(move || storage.clone())
}

async fn dispatch<S>(action: Action, storage: Arc<S>) -> std::result::Result<Response, Rejection>
where
    S: Storage + Send + Sync + 'static,
{
    let result = tokio::task::spawn_blocking(move || handle(storage.as_ref(), action)).await;

    let response = match result {
        Ok(Ok(outcome)) => render(outcome),
        Ok(Err(e)) => {
            error!("Request failed: {}", e);
            warp::reply::with_status(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
        Err(e) => {
            error!("Request task failed: {}", e);
            warp::reply::with_status(
                "Internal server error".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response()
        }
    };
    Ok(response)
}

fn render(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Listing(posts) => warp::reply::json(&posts).into_response(),
        Outcome::Form(post) => warp::reply::json(&post).into_response(),
        Outcome::Created(_) | Outcome::Redirect => {
            warp::redirect::see_other(Uri::from_static("/")).into_response()
        }
        Outcome::NotFound(id) => warp::reply::with_status(
            Error::NotFound(id).to_string(),
            StatusCode::NOT_FOUND,
        )
        .into_response(),
    }
}

fn log_request(info: warp::log::Info<'_>) {
    let method = info.method();
    let path = info.path();
    let status = info.status();
    let elapsed = info.elapsed().as_millis();

    if status.is_success() || status.is_redirection() {
        info!(
            "Method: {}, Path: {}, Status: {}, Elapsed Time: {}ms",
            method, path, status, elapsed
        );
    } else {
        error!(
            "Method: {}, Path: {}, Status: {}, Elapsed Time: {}ms",
            method, path, status, elapsed
        );
    }
}

/// Serve the post routes over the configured data file until the process exits.
pub async fn serve(config: &Config) -> Result<()> {
    let address: SocketAddr = config.get_bind_addr().parse().map_err(|e| {
        Error::InvalidConfig(format!(
            "Invalid bind address {}: {}",
            config.get_bind_addr(),
            e
        ))
    })?;

    let storage = JsonFileStorage::new(config);
    if !storage.path().exists() {
        warn!(
            "{} does not exist yet; requests will fail until `init` is run",
            storage.path().display()
        );
    }
    let data_file = storage.path().display().to_string();

    let api = routes(Arc::new(storage)).with(warp::log::custom(log_request));
    let (bound, server) = warp::serve(api)
        .try_bind_ephemeral(address)
        .map_err(|e| Error::Server(format!("Failed to bind {}: {}", address, e)))?;

    info!("Serving posts from {} on {}", data_file, bound);
    server.await;
    Ok(())
}
