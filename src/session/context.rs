use thiserror::Error;
use uuid::Uuid;

use crate::records::Student;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("incorrect admin passcode")]
    InvalidAdminCode,

    #[error("incorrect access code (last four digits of the registered phone)")]
    InvalidParentCode,

    #[error("this action requires an admin session")]
    NotAdmin,

    #[error("not signed in")]
    NotSignedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    /// A parent only ever sees their own child
    Parent { student_id: Uuid },
}

/// Who is signed in and which student they are looking at.
///
/// Transitions take the current value and return the next one; nothing is
/// mutated in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    role: Option<Role>,
    selected: Option<Uuid>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn login_admin(self, code: &str, expected: &str) -> Result<Self, SessionError> {
        if code.trim() != expected || expected.is_empty() {
            return Err(SessionError::InvalidAdminCode);
        }
        Ok(Self {
            role: Some(Role::Admin),
            selected: None,
        })
    }

    /// Parents sign in with the last four digits of the student's phone.
    pub fn login_parent(self, student: &Student, code: &str) -> Result<Self, SessionError> {
        let digits: String = code.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() || digits != student.access_code() {
            return Err(SessionError::InvalidParentCode);
        }
        Ok(Self {
            role: Some(Role::Parent {
                student_id: student.id,
            }),
            selected: None,
        })
    }

    pub fn select_student(self, student_id: Uuid) -> Result<Self, SessionError> {
        match self.role {
            Some(Role::Admin) => Ok(Self {
                selected: Some(student_id),
                ..self
            }),
            Some(Role::Parent { .. }) => Err(SessionError::NotAdmin),
            None => Err(SessionError::NotSignedIn),
        }
    }

    pub fn clear_selection(self) -> Self {
        Self {
            selected: None,
            ..self
        }
    }

    pub fn logout(self) -> Self {
        Self::anonymous()
    }

    /// The student whose details are on screen: a parent's own child, or the
    /// admin's current selection.
    pub fn visible_student(&self) -> Option<Uuid> {
        match self.role {
            Some(Role::Parent { student_id }) => Some(student_id),
            Some(Role::Admin) => self.selected,
            None => None,
        }
    }

    pub fn require_admin(&self) -> Result<(), SessionError> {
        match self.role {
            Some(Role::Admin) => Ok(()),
            Some(Role::Parent { .. }) => Err(SessionError::NotAdmin),
            None => Err(SessionError::NotSignedIn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::BASE_SCORE;

    fn student() -> Student {
        Student {
            id: Uuid::new_v4(),
            name: "Omar Khalid".to_string(),
            phone: "0551234567".to_string(),
            base_score: BASE_SCORE,
        }
    }

    #[test]
    fn test_admin_login() {
        let session = Session::anonymous().login_admin("2030", "2030").unwrap();
        assert!(session.is_admin());
        assert_eq!(
            Session::anonymous().login_admin("1234", "2030"),
            Err(SessionError::InvalidAdminCode)
        );
    }

    #[test]
    fn test_empty_expected_code_never_matches() {
        assert_eq!(
            Session::anonymous().login_admin("", ""),
            Err(SessionError::InvalidAdminCode)
        );
    }

    #[test]
    fn test_parent_login_uses_last_four_digits() {
        let student = student();
        let session = Session::anonymous().login_parent(&student, "4567").unwrap();
        assert_eq!(session.visible_student(), Some(student.id));
        assert_eq!(
            Session::anonymous().login_parent(&student, "0551"),
            Err(SessionError::InvalidParentCode)
        );
    }

    #[test]
    fn test_parent_cannot_select_other_students() {
        let student = student();
        let session = Session::anonymous().login_parent(&student, "4567").unwrap();
        assert_eq!(
            session.select_student(Uuid::new_v4()),
            Err(SessionError::NotAdmin)
        );
        assert_eq!(session.require_admin(), Err(SessionError::NotAdmin));
    }

    #[test]
    fn test_admin_selection_round_trip() {
        let id = Uuid::new_v4();
        let admin = Session::anonymous().login_admin("2030", "2030").unwrap();
        let selected = admin.select_student(id).unwrap();
        assert_eq!(selected.visible_student(), Some(id));
        assert_eq!(selected.clear_selection().visible_student(), None);
        // The previous value is untouched
        assert_eq!(admin.visible_student(), None);
    }

    #[test]
    fn test_logout_clears_everything() {
        let admin = Session::anonymous()
            .login_admin("2030", "2030")
            .unwrap()
            .select_student(Uuid::new_v4())
            .unwrap();
        let out = admin.logout();
        assert_eq!(out, Session::anonymous());
        assert_eq!(out.select_student(Uuid::new_v4()), Err(SessionError::NotSignedIn));
    }
}
