//! Record types served by the records service.
//!
//! Each collection has a stored type, a creation payload, and an update
//! payload whose fields are all optional. Updates apply only the fields the
//! client sent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record type that can live in a [`crate::store::RecordStore`].
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Creation payload (every field except `id`).
    type New: DeserializeOwned + Send + 'static;

    /// Partial update payload.
    type Update: DeserializeOwned + Send + 'static;

    /// Singular label used in messages ("Student").
    const LABEL: &'static str;

    /// Path segment of the collection under `/api` ("students").
    const COLLECTION: &'static str;

    fn id(&self) -> i64;

    /// Build a record from its payload and a freshly assigned id.
    fn create(id: i64, new: Self::New) -> Self;

    /// Overwrite the fields present in `update`.
    fn apply(&mut self, update: Self::Update);

    /// Records present when the service starts.
    fn seed() -> Vec<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub email: String,
    pub course: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub course: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub email: Option<String>,
    pub course: Option<String>,
}

impl Record for Student {
    type New = NewStudent;
    type Update = StudentUpdate;

    const LABEL: &'static str = "Student";
    const COLLECTION: &'static str = "students";

    fn id(&self) -> i64 {
        self.id
    }

    fn create(id: i64, new: NewStudent) -> Self {
        Self {
            id,
            name: new.name,
            age: new.age,
            email: new.email,
            course: new.course,
        }
    }

    fn apply(&mut self, update: StudentUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(course) = update.course {
            self.course = course;
        }
    }

    fn seed() -> Vec<Self> {
        let student = |id, name: &str, age, email: &str, course: &str| Student {
            id,
            name: name.to_string(),
            age,
            email: email.to_string(),
            course: course.to_string(),
        };

        vec![
            student(1, "John Doe", 20, "john.doe@example.com", "Computer Science"),
            student(2, "Jane Smith", 22, "jane.smith@example.com", "Information Technology"),
            student(3, "Mike Johnson", 21, "mike.johnson@example.com", "Software Engineering"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub credits: Option<u32>,
}

impl Record for Course {
    type New = NewCourse;
    type Update = CourseUpdate;

    const LABEL: &'static str = "Course";
    const COLLECTION: &'static str = "courses";

    fn id(&self) -> i64 {
        self.id
    }

    fn create(id: i64, new: NewCourse) -> Self {
        Self {
            id,
            name: new.name,
            code: new.code,
            description: new.description,
            credits: new.credits,
        }
    }

    fn apply(&mut self, update: CourseUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(code) = update.code {
            self.code = code;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(credits) = update.credits {
            self.credits = credits;
        }
    }

    fn seed() -> Vec<Self> {
        let course = |id, name: &str, code: &str, description: &str, credits| Course {
            id,
            name: name.to_string(),
            code: code.to_string(),
            description: description.to_string(),
            credits,
        };

        vec![
            course(1, "Computer Science", "CS101", "Introduction to Computer Science", 3),
            course(2, "Information Technology", "IT201", "Fundamentals of Information Technology", 3),
            course(3, "Software Engineering", "SE301", "Principles of Software Engineering", 4),
        ]
    }
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}
