//! Built-in course syllabus and the fixed system instruction sent with every
//! completion request.

use std::fmt;

/// Directive that constrains the assistant to the syllabus text.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a helpful and friendly chatbot for students of the CIS 275 course. Your name is "CIS 275 Course Assistant".

You must answer questions based *only* on the provided syllabus text.

If the answer is not found in the syllabus, you must state that you cannot find the information in the syllabus. Do not make up answers.

Be concise in your responses. Format your answers clearly using markdown where appropriate (like lists or bolding)."#;

/// ESCC CIS 275 syllabus, the default knowledge base.
pub const BUILTIN_SYLLABUS: &str = r#"
ENTERPRISE STATE COMMUNITY COLLEGE
Syllabus: CIS 275 - Workstation Administration
3 Credit/Semester Hours

## Course Information
**Course Description:** This course provides a study of client system administration in a network environment. Topics include installing, monitoring, maintaining, and troubleshooting client operating system software and managing hardware devices and shared resources. Students gain hands-on experience in client operating system installation and basic administration of network workstations.
**Prerequisite(s):** None
**Mode of Delivery:** Online
**Location:** Online
**Dates:** August 18, 2025 – December 11, 2025

## Instructor Information
**Name:** Mr. Lee Scarborough
**Office Location:** Forrester Hall 105
**Office Hours:**
*   Monday & Wednesday: 8:00-9:00 am, 10:15-11:00 am, 2:30-4:00 pm
*   Tuesday & Thursday: 8:00 - 9:00 am, 10:15 – 11:00 am, 11:30 am - 1:00 pm, 2:15 - 4:00 pm
**Phone:** (334) 348-4923 (call or text)
**Email:** lscarborough@escc.edu
**Microsoft Teams:** "schedule a virtual meeting with me" link is available.
**Response Time to Grading:** I will return graded assignments within 7 days of due date.
**Response Time to Email:** I will respond within 24 hours Monday through Thursday. Friday through Sunday emails will be responded to on Monday, though possibly sooner.

## Division Information:
**Chair Name:** Jennifer Nelson
**Office Location:** Forrester Hall 103
**Phone:** (334) 347-2623 ext. 2338
**Email:** jnelson@escc.edu

## Textbooks, Supplies, and Materials
1.  **Required:** uCertify Endpoint Administrator (MD-102). This is a **Digital access code only**. There is no physical book. Purchase your access code through the ESCC bookstore: https://bookstore.escc.edu/textbooks. You must contact the bookstore to receive your access code (Email: bookstore@escc.edu, Call: 334-347-2623, or Visit in-person).
2.  **Materials and equipment to be used by instructor:** Canvas LMS, uCertify Learning Platform.

## Course Objectives
1.  Deploy Windows client
2.  Manage identity and compliance
3.  Manage, maintain, and protect devices
4.  Manage applications

## Methods of Instruction and Evaluation
*   **Quizzes:** 30% of final grade.
*   **Labs:** 30% of final grade (via uCertify).
*   **Exams:** 20% of final grade (one proctored quiz, practice exams, one final exam).
*   **Discussions:** 20% of final grade.

## Course Requirements and Grading Criteria
**Dropped grades:** 1 lowest exam grade, 1 lowest lab grade, 2 lowest quiz grades, and 2 lowest discussion grades will be dropped.
**Grading scale:** A = 90-100%, B = 80-89%, C = 70-79%, D = 60-69%, F = 0-59%

## Course Policies
**Assignment Guidelines:** Submit all assignments by the due date listed in Canvas.
**Grade Penalties:** Work not submitted by the due date will be given a zero for that assignment.
**Extenuating circumstances:** Considered if notice is provided at least 24 hours prior to the due date, or within 24 hours after. Documentation may be required.
**Final Grades:** Posted to the Student Information Center via the MyESCC link, not on Canvas, email, or phone.

## Proctoring Policy
This course uses remote proctoring (Honorlock) for exams. Students must install a Chrome extension, provide a valid photo ID (driver's license, passport, etc.), and scan the testing environment. **An external USB webcam is required** with at least 720p resolution. A built-in laptop camera is NOT sufficient. Do NOT purchase the Walmart Branded Camera (ONN).

## Attendance and Withdrawal Policy
The last day to withdraw without academic penalty is July 24th.

## Academic Honesty
All work must be original for this course. Plagiarism will result in a zero on the assignment, an F in the course, and will be reported.

## Artificial Intelligence (AI)
Students are encouraged to use AI as a tool to assist with learning, especially for revising and improving their own writing for discussion assignments. Submitting work that is not your own is a violation of the Academic Honesty policy.

## Course Outline
*   Aug 18 - 25: Start Here - attendance verification quiz (Due Aug 22)
*   Aug 25 - Sep 8: Lesson 1: Configuring Users (Due Sep 8)
*   Sep 8 - 22: Lesson 2: Deploy Windows Client (Due Sep 22)
*   Sep 22 - Oct 6: Lesson 3: Managing Identify and Access (Due Oct 6)
*   Oct 6 - 20: Lesson 4: Planning and Managing Microsoft Intune (Due Oct 20)
*   Oct 20 - Nov 3: Lesson 5: Managing Devices (Due Nov 3)
*   Nov 3 - 17: Lesson 6: Managing Security (Due Nov 17)
*   Nov 17 - 24: Lesson 7: Monitoring Devices (Due Nov 24)
*   Nov 24 - 28: Thanksgiving Holidays
*   Dec 1 - 8: Exam review (Due Dec 8)
*   Dec 8 - 11: Final exam (Due Dec 11)

## Disability Services
Contact Dava Leverette (dleverette@escc.edu) for accommodations.
"#;

/// Raised when an alternative syllabus body is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptySyllabus;

impl fmt::Display for EmptySyllabus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syllabus text is empty")
    }
}

impl std::error::Error for EmptySyllabus {}

/// Read-only prompt context: the instruction template plus the syllabus it
/// is anchored to. Built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllabusContext {
    instruction: String,
    syllabus: String,
}

impl SyllabusContext {
    pub fn builtin() -> Self {
        Self {
            instruction: SYSTEM_INSTRUCTION.to_string(),
            syllabus: BUILTIN_SYLLABUS.to_string(),
        }
    }

    /// Same instruction, different course. The text is used as-is.
    pub fn with_syllabus_text(text: impl Into<String>) -> Result<Self, EmptySyllabus> {
        let syllabus = text.into();
        if syllabus.trim().is_empty() {
            return Err(EmptySyllabus);
        }
        Ok(Self {
            instruction: SYSTEM_INSTRUCTION.to_string(),
            syllabus,
        })
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn syllabus(&self) -> &str {
        &self.syllabus
    }

    /// Full system instruction with the syllabus embedded after a
    /// `SYLLABUS:` marker line.
    pub fn system_instruction(&self) -> String {
        format!("{}\n\nSYLLABUS:\n{}", self.instruction, self.syllabus)
    }
}

impl Default for SyllabusContext {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_embeds_syllabus_after_marker() {
        let context = SyllabusContext::builtin();
        let prompt = context.system_instruction();

        assert!(prompt.starts_with(SYSTEM_INSTRUCTION));
        let (_, syllabus) = prompt
            .split_once("\n\nSYLLABUS:\n")
            .expect("marker should be present");
        assert_eq!(syllabus, BUILTIN_SYLLABUS);
    }

    #[test]
    fn builtin_syllabus_lists_instructor_contact() {
        let syllabus = SyllabusContext::builtin();
        assert!(syllabus.syllabus().contains("Mr. Lee Scarborough"));
        assert!(syllabus.syllabus().contains("lscarborough@escc.edu"));
        assert!(syllabus.instruction().contains("based *only* on the provided syllabus"));
    }

    #[test]
    fn custom_syllabus_keeps_instruction() {
        let context = SyllabusContext::with_syllabus_text("CIS 101\nOffice: Room 4").unwrap();
        assert_eq!(context.instruction(), SYSTEM_INSTRUCTION);
        assert!(context.system_instruction().ends_with("SYLLABUS:\nCIS 101\nOffice: Room 4"));
    }

    #[test]
    fn blank_custom_syllabus_is_rejected() {
        assert_eq!(
            SyllabusContext::with_syllabus_text("  \n\t"),
            Err(EmptySyllabus)
        );
    }
}
