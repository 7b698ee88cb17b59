use serde::Deserialize;
use validator::Validate;

// Request body for registering a new user
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterSchema {
    #[validate(
        required(message = "Name, email and password are required"),
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Name, email and password are required"),
        email(message = "Email is not valid")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Name, email and password are required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: Option<String>,
}

impl RegisterSchema {
    /// Trim the name, trim and lower-case the email. The password is left as typed.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            email: self.email.map(|e| e.trim().to_lowercase()),
            password: self.password,
        }
    }
}

// Request body for logging in
#[derive(Debug, Default, Deserialize)]
pub struct LoginSchema {
    pub email: Option<String>,
    pub password: Option<String>,
}

// Request body for creating a new Todo
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoSchema {
    #[validate(
        required(message = "Title and description are required"),
        length(min = 1, max = 100, message = "Title must be between 1 and 100 characters")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Title and description are required"),
        length(min = 1, max = 500, message = "Description must be between 1 and 500 characters")
    )]
    pub description: Option<String>,
}

impl CreateTodoSchema {
    pub fn normalized(self) -> Self {
        Self {
            title: trim(self.title),
            description: trim(self.description),
        }
    }
}

// Request body for updating a Todo. Only these two fields can ever change.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodoSchema {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
}

impl UpdateTodoSchema {
    pub fn normalized(self) -> Self {
        Self {
            title: trim(self.title),
            description: trim(self.description),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

fn trim(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}
