use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    authentication::{
        get_jwt_token, hash_password_argon2, verify_password_argon2, AuthUser, MaybeUser,
    },
    config::Config,
    data_formats::*,
    db_helpers::*,
    errors::RequestError,
    feed::{paginate, FeedScope},
    ownership::can_mutate,
    JsonResponse,
};

type UserJson = UserWrapper<UserResponse>;
type PostJson = PostWrapper<PostResponse>;
type CommentJson = CommentWrapper<CommentResponse>;

type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

// ----------------- User Handlers -----------------
/// Absent fields are left alone; present ones must not be blank.
fn check_credentials(username: Option<&str>, password: Option<&str>) -> Result<(), RequestError> {
    let blank_username = username.map_or(false, |username| username.trim().is_empty());
    let blank_password = password.map_or(false, str::is_empty);
    if blank_username || blank_password {
        return Err(RequestError::RunTimeError(
            "Username and password must not be empty",
        ));
    }
    Ok(())
}

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(config): Extension<Arc<Config>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<LoginRequest>>,
) -> JsonResult<UserJson> {
    let user = get_user_by_username(&pool, &request.username)
        .await?
        .ok_or(RequestError::RunTimeError("Invalid username or password"))?;
    let is_password_correct = verify_password_argon2(request.password, &user.password)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification failed");
            RequestError::RunTimeError("Could not login user\nPlease Try again")
        })?;
    if !is_password_correct {
        return Err(RequestError::RunTimeError("Invalid username or password"));
    }

    let token = get_jwt_token(user.id, &config.jwt_secret).map_err(|e| {
        tracing::error!(error = %e, "could not issue jwt");
        RequestError::ServerError
    })?;
    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(config): Extension<Arc<Config>>,
    Json(UserWrapper { mut user }): Json<UserWrapper<RegisterRequest>>,
) -> JsonResult<UserJson> {
    check_credentials(Some(&user.username), Some(&user.password))?;
    user.password = hash_password_argon2(user.password).await.map_err(|_| {
        RequestError::RunTimeError("Could not register user\nPlease Try: again")
    })?;

    let user = insert_user(&pool, &user).await.map_err(|e| {
        if e.is_unique_violation() {
            return RequestError::RunTimeError("Username already exists");
        }
        e
    })?;

    let token = get_jwt_token(user.id, &config.jwt_secret).map_err(|_| {
        RequestError::RunTimeError("Could not generate JWT successfully\nTry again later")
    })?;
    tracing::info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn get_current_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id, token }: AuthUser,
) -> JsonResult<UserJson> {
    let user = get_user_by_id(&pool, id)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn update_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id, token }: AuthUser,
    Json(UserWrapper { user }): Json<UserWrapper<UpdateUserRequest>>,
) -> JsonResult<UserJson> {
    check_credentials(user.username.as_deref(), user.password.as_deref())?;
    let user = update_user_in_db(&pool, id, user).await.map_err(|e| {
        if e.is_unique_violation() {
            return RequestError::RunTimeError("Username already exists");
        }
        e
    })?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn delete_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id, .. }: AuthUser,
) -> Result<StatusCode, RequestError> {
    delete_user_in_db(&pool, id).await?;
    tracing::info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
// ----------------- End User Handlers -----------------

// ----------------- Profile Handlers -----------------
pub async fn get_profile(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(username): Path<String>,
    Query(page): Query<PageQueryParams>,
) -> JsonResult<ProfileWrapper> {
    let now = Utc::now();
    let profile = get_profile_by_username_in_db(&pool, &username).await?;
    let viewer_is_owner = maybe_user.get_id() == Some(profile.id);
    let feed = compose_feed_in_db(&pool, &FeedScope::Author(username), viewer_is_owner, now).await?;
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse::new(profile),
        posts: MultiplePostsWrapper::new(paginate(feed, page.number()?)?),
    }))
}

// ----------------- Post Handlers -----------------
pub async fn list_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(page): Query<PageQueryParams>,
) -> JsonResult<MultiplePostsWrapper> {
    let feed = compose_feed_in_db(&pool, &FeedScope::All, false, Utc::now()).await?;
    Ok(Json(MultiplePostsWrapper::new(paginate(feed, page.number()?)?)))
}

pub async fn category_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Query(page): Query<PageQueryParams>,
) -> JsonResult<CategoryPostsWrapper> {
    let (category, feed) = compose_category_feed_in_db(&pool, &slug, Utc::now()).await?;
    Ok(Json(CategoryPostsWrapper {
        category: CategoryResponse::new(category),
        posts: MultiplePostsWrapper::new(paginate(feed, page.number()?)?),
    }))
}

pub async fn create_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id, .. }: AuthUser,
    Json(PostWrapper { post }): Json<PostWrapper<CreatePostRequest>>,
) -> Result<JsonResponse<PostJson>, RequestError> {
    let post = create_post_in_db(&pool, id, post).await?;
    tracing::info!(post_id = post.id, author_id = id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(PostWrapper {
            post: PostResponse::new(post),
        }),
    ))
}

pub async fn get_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(id): Path<i64>,
) -> JsonResult<PostDetailWrapper> {
    let post = get_post_for_detail_in_db(&pool, id, maybe_user.get_id(), Utc::now()).await?;
    let comments = get_comments_for_post_in_db(&pool, post.id).await?;
    Ok(Json(PostDetailWrapper {
        post: PostResponse::new(post),
        comments: comments.into_iter().map(CommentResponse::new).collect(),
    }))
}

/// Anyone but the author is sent back to the post instead of being refused.
pub async fn update_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(id): Path<i64>,
    Json(PostWrapper { post: request }): Json<PostWrapper<UpdatePostRequest>>,
) -> Result<Response, RequestError> {
    let post = get_post_by_id_in_db(&pool, id)
        .await?
        .ok_or(RequestError::NotFound("Post not found"))?;
    if !can_mutate(&post, maybe_user.get_id()) {
        tracing::debug!(post_id = id, "edit by non-author redirected to post");
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }
    let post = update_post_in_db(&pool, id, request).await?;
    Ok(Json(PostWrapper {
        post: PostResponse::new(post),
    })
    .into_response())
}

pub async fn delete_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    let post = get_post_by_id_in_db(&pool, id)
        .await?
        .ok_or(RequestError::NotFound("Post not found"))?;
    if !can_mutate(&post, Some(user_id)) {
        return Err(RequestError::Forbidden);
    }
    delete_post_in_db(&pool, id).await?;
    tracing::info!(post_id = id, author_id = user_id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Comment Handlers -----------------
pub async fn add_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(post_id): Path<i64>,
    Json(CommentWrapper { comment }): Json<CommentWrapper<CommentRequest>>,
) -> Result<JsonResponse<CommentJson>, RequestError> {
    let comment = add_comment_to_post_in_db(&pool, user_id, post_id, comment).await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentWrapper {
            comment: CommentResponse::new(comment),
        }),
    ))
}

/// Looks up a comment under `post_id` and checks the viewer wrote it.
async fn get_own_comment(
    pool: &SqlitePool,
    user_id: i64,
    post_id: i64,
    comment_id: i64,
) -> Result<(), RequestError> {
    let comment = get_comment_by_id_in_db(pool, comment_id)
        .await?
        .filter(|comment| comment.post_id == post_id)
        .ok_or(RequestError::NotFound("Comment not found"))?;
    if !can_mutate(&comment, Some(user_id)) {
        return Err(RequestError::Forbidden);
    }
    Ok(())
}

pub async fn edit_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(CommentWrapper { comment }): Json<CommentWrapper<CommentRequest>>,
) -> JsonResult<CommentJson> {
    get_own_comment(&pool, user_id, post_id, comment_id).await?;
    let comment = update_comment_in_db(&pool, comment_id, comment).await?;
    Ok(Json(CommentWrapper {
        comment: CommentResponse::new(comment),
    }))
}

pub async fn delete_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<StatusCode, RequestError> {
    get_own_comment(&pool, user_id, post_id, comment_id).await?;
    delete_comment_in_db(&pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Category / Location Handlers -----------------
pub async fn create_category(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id, .. }: AuthUser,
    Json(CategoryWrapper { category }): Json<CategoryWrapper<CreateCategoryRequest>>,
) -> Result<JsonResponse<CategoryWrapper<CategoryResponse>>, RequestError> {
    let category = create_category_in_db(&pool, category).await.map_err(|e| {
        if e.is_unique_violation() {
            return RequestError::RunTimeError("Slug already exists");
        }
        e
    })?;
    tracing::info!(slug = %category.slug, user_id, "category created");
    Ok((
        StatusCode::CREATED,
        Json(CategoryWrapper {
            category: CategoryResponse::new(category),
        }),
    ))
}

pub async fn delete_category(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, RequestError> {
    delete_category_in_db(&pool, &slug).await?;
    tracing::info!(%slug, user_id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_location(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id, .. }: AuthUser,
    Json(LocationWrapper { location }): Json<LocationWrapper<CreateLocationRequest>>,
) -> Result<JsonResponse<LocationWrapper<LocationResponse>>, RequestError> {
    let location = create_location_in_db(&pool, location).await?;
    tracing::info!(location_id = location.id, user_id, "location created");
    Ok((
        StatusCode::CREATED,
        Json(LocationWrapper {
            location: LocationResponse::new(location),
        }),
    ))
}

pub async fn delete_location(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_location_in_db(&pool, id).await?;
    tracing::info!(location_id = id, user_id, "location deleted");
    Ok(StatusCode::NO_CONTENT)
}
