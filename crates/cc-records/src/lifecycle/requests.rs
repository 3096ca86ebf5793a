//! Typed requests built from positional invocation arguments.
//!
//! Parsing is pure: no ledger access happens here. Identifying numbers are
//! parsed before keys are derived, so `"01"` and `"1"` name the same record.

use crate::domain::{
    grade_key, prize_key, student_key, NewGrade, NewPrize, NewStudent, RecordKey, RecordStatus,
    StudentRef, ValidationError,
};

/// Split `args` into exactly `N` fields or fail with an arity error.
pub fn fields<'a, const N: usize>(
    function: &str,
    args: &'a [String],
) -> Result<[&'a str; N], ValidationError> {
    if args.len() != N {
        return Err(ValidationError::Arity {
            function: function.to_string(),
            expected: N,
            got: args.len(),
        });
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

/// Non-empty text field.
pub fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value.to_string())
}

/// Unsigned 64-bit field.
pub fn parse_u64(field: &'static str, value: &str) -> Result<u64, ValidationError> {
    value.parse().map_err(|_| ValidationError::InvalidNumber {
        field,
        expected: "unsigned integer",
        value: value.to_string(),
    })
}

/// Unsigned 32-bit field.
pub fn parse_u32(field: &'static str, value: &str) -> Result<u32, ValidationError> {
    value.parse().map_err(|_| ValidationError::InvalidNumber {
        field,
        expected: "unsigned integer",
        value: value.to_string(),
    })
}

/// Finite floating point score.
pub fn parse_score(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    match value.parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(score),
        _ => Err(ValidationError::InvalidNumber {
            field,
            expected: "finite number",
            value: value.to_string(),
        }),
    }
}

impl NewStudent {
    /// `school, major, id, name`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [school, major, id, name] = fields::<4>(function, args)?;
        Ok(Self {
            school: non_empty("school", school)?,
            major: non_empty("major", major)?,
            id: parse_u64("id", id)?,
            name: non_empty("name", name)?,
        })
    }

    /// Key the record will be stored under.
    pub fn key(&self) -> RecordKey {
        student_key(&self.school, self.id)
    }
}

impl NewGrade {
    /// `course, courseId, teacher, school, studentId, year, score, semester`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [course, course_id, teacher, school, student_id, year, score, semester] =
            fields::<8>(function, args)?;
        Ok(Self {
            course: non_empty("course", course)?,
            course_id: non_empty("courseId", course_id)?,
            teacher: non_empty("teacher", teacher)?,
            school: non_empty("school", school)?,
            student_id: parse_u64("studentId", student_id)?,
            year: parse_u32("year", year)?,
            score: parse_score("score", score)?,
            semester: parse_u32("semester", semester)?,
        })
    }

    /// Key the record will be stored under.
    pub fn key(&self) -> RecordKey {
        grade_key(
            &self.school,
            self.student_id,
            &self.course_id,
            self.year,
            self.semester,
        )
    }
}

impl NewPrize {
    /// `school, studentId, name, prizeId, year, level, institution`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [school, student_id, name, id, year, level, institution] =
            fields::<7>(function, args)?;
        Ok(Self {
            student: StudentRef::new(
                non_empty("school", school)?,
                parse_u64("studentId", student_id)?,
            ),
            name: non_empty("name", name)?,
            id: non_empty("prizeId", id)?,
            year: parse_u32("year", year)?,
            level: non_empty("level", level)?,
            institution: non_empty("institution", institution)?,
        })
    }

    /// Key the record will be stored under.
    pub fn key(&self) -> RecordKey {
        prize_key(&self.id)
    }
}

/// Identifying fields of a student record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentLocator {
    /// School name.
    pub school: String,
    /// Student id.
    pub student_id: u64,
}

impl StudentLocator {
    fn from_fields(school: &str, student_id: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            school: non_empty("school", school)?,
            student_id: parse_u64("studentId", student_id)?,
        })
    }

    /// `school, studentId`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [school, student_id] = fields::<2>(function, args)?;
        Self::from_fields(school, student_id)
    }

    /// Derived storage key.
    pub fn key(&self) -> RecordKey {
        student_key(&self.school, self.student_id)
    }
}

/// Identifying fields of a grade record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeLocator {
    /// School name.
    pub school: String,
    /// Student id.
    pub student_id: u64,
    /// Course id.
    pub course_id: String,
    /// Academic year.
    pub year: u32,
    /// Semester.
    pub semester: u32,
}

impl GradeLocator {
    fn from_fields(
        school: &str,
        student_id: &str,
        course_id: &str,
        year: &str,
        semester: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            school: non_empty("school", school)?,
            student_id: parse_u64("studentId", student_id)?,
            course_id: non_empty("courseId", course_id)?,
            year: parse_u32("year", year)?,
            semester: parse_u32("semester", semester)?,
        })
    }

    /// `school, studentId, courseId, year, semester`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [school, student_id, course_id, year, semester] = fields::<5>(function, args)?;
        Self::from_fields(school, student_id, course_id, year, semester)
    }

    /// Derived storage key.
    pub fn key(&self) -> RecordKey {
        grade_key(
            &self.school,
            self.student_id,
            &self.course_id,
            self.year,
            self.semester,
        )
    }
}

/// Identifying field of a prize record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrizeLocator {
    /// Prize id.
    pub prize_id: String,
}

impl PrizeLocator {
    /// `prizeId`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [prize_id] = fields::<1>(function, args)?;
        Ok(Self {
            prize_id: non_empty("prizeId", prize_id)?,
        })
    }

    /// Derived storage key.
    pub fn key(&self) -> RecordKey {
        prize_key(&self.prize_id)
    }
}

/// A validate request: which record, and the terminal status to set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange<L> {
    /// Record to transition.
    pub locator: L,
    /// Requested status, always terminal.
    pub target: RecordStatus,
}

impl StatusChange<StudentLocator> {
    /// `school, studentId, newStatus`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [school, student_id, status] = fields::<3>(function, args)?;
        Ok(Self {
            locator: StudentLocator::from_fields(school, student_id)?,
            target: RecordStatus::parse_target(status)?,
        })
    }
}

impl StatusChange<GradeLocator> {
    /// `school, studentId, courseId, year, semester, newStatus`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [school, student_id, course_id, year, semester, status] = fields::<6>(function, args)?;
        Ok(Self {
            locator: GradeLocator::from_fields(school, student_id, course_id, year, semester)?,
            target: RecordStatus::parse_target(status)?,
        })
    }
}

impl StatusChange<PrizeLocator> {
    /// `prizeId, newStatus`
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ValidationError> {
        let [prize_id, status] = fields::<2>(function, args)?;
        Ok(Self {
            locator: PrizeLocator {
                prize_id: non_empty("prizeId", prize_id)?,
            },
            target: RecordStatus::parse_target(status)?,
        })
    }
}
