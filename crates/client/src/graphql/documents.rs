//! Query and mutation documents sent to the content API.

const CATEGORY_FIELDS: &str = "id name slug status created_at updated_at";

const POST_FIELDS: &str = "id title slug status content created_at updated_at category { id name slug status }";

fn document(operation: &str, header: &str, call: &str, fields: Option<&str>) -> String {
    match fields {
        Some(fields) => format!("{operation} {header} {{ {call} {{ {fields} }} }}"),
        None => format!("{operation} {header} {{ {call} }}"),
    }
}

pub fn list_categories() -> String {
    document(
        "query",
        "ListCategories($where: WhereCategoriesDto)",
        "listCategories(where: $where)",
        Some(CATEGORY_FIELDS),
    )
}

pub fn get_category() -> String {
    document("query", "GetCategory($id: Uuid!)", "getCategory(id: $id)", Some(CATEGORY_FIELDS))
}

pub fn create_category() -> String {
    document(
        "mutation",
        "CreateCategory($data: CreateCategoryDto!)",
        "createCategory(data: $data)",
        Some(CATEGORY_FIELDS),
    )
}

pub fn update_category() -> String {
    document(
        "mutation",
        "UpdateCategory($id: Uuid!, $data: UpdateCategoryDto!)",
        "updateCategory(id: $id, data: $data)",
        Some(CATEGORY_FIELDS),
    )
}

pub fn delete_category() -> String {
    document("mutation", "DeleteCategory($id: Uuid!)", "deleteCategory(id: $id)", None)
}

pub fn list_posts() -> String {
    document("query", "ListPosts($where: WherePostsDto)", "listPosts(where: $where)", Some(POST_FIELDS))
}

pub fn get_post() -> String {
    document("query", "GetPost($id: Uuid!)", "getPost(id: $id)", Some(POST_FIELDS))
}

pub fn create_post() -> String {
    document("mutation", "CreatePost($data: CreatePostDto!)", "createPost(data: $data)", Some(POST_FIELDS))
}

pub fn update_post() -> String {
    document(
        "mutation",
        "UpdatePost($id: Uuid!, $data: UpdatePostDto!)",
        "updatePost(id: $id, data: $data)",
        Some(POST_FIELDS),
    )
}

pub fn delete_post() -> String {
    document("mutation", "DeletePost($id: Uuid!)", "deletePost(id: $id)", None)
}

pub fn ping() -> String {
    "query Ping { ping }".to_string()
}
