pub mod course;
pub mod enrollment;
pub mod history;
pub mod student;
pub mod values;

pub use course::{Course, NewCourseRequest, UpdateScheduleRequest};
pub use enrollment::{Enrollment, EnrollmentRequest, UpdateEnrollmentRequest};
pub use history::{CourseDeletion, CourseHistory, EnrollmentHistory, StudentDeletion, StudentHistory};
pub use student::{NewStudentRequest, Student, UpdateSemesterRequest};
pub use values::{Credits, EnrollmentStatus, ScheduleSlot, Semester};
