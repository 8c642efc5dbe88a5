use super::Cell;

/// Canonical staff attribute a spreadsheet column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    StaffId,
    RoleId,
    DepartmentId,
    DesignationId,
    FirstName,
    LastName,
    FatherName,
    MotherName,
    Email,
    Gender,
    MaritalStatus,
    DateOfBirth,
    DateOfJoining,
    Phone,
    EmergencyPhone,
    CurrentAddress,
    PermanentAddress,
    Qualification,
    WorkExperience,
    Note,
    EpfNo,
    BasicSalary,
    ContractType,
    WorkShift,
    WorkLocation,
    NumberOfLeaves,
    BankAccountName,
    BankAccountNumber,
    BankName,
    IfscCode,
    BankBranch,
    FacebookUrl,
    TwitterUrl,
    LinkedinUrl,
    InstagramUrl,
}

pub(super) struct FieldSpec {
    pub(super) field: CanonicalField,
    /// Column title written to the template.
    pub(super) label: &'static str,
    /// Value shown in the template's example row.
    pub(super) example: &'static str,
    /// Accepted header spellings, already normalized.
    aliases: &'static [&'static str],
}

/// Every importable column, in template order.
pub(super) const FIELDS: &[FieldSpec] = &[
    FieldSpec { field: CanonicalField::StaffId, label: "Staff ID", example: "STF-1001",
        aliases: &["staff id", "staff_id", "staffid", "employee id", "employee_id", "employeeid", "emp id", "staff no", "staff number"] },
    FieldSpec { field: CanonicalField::RoleId, label: "Role ID", example: "2",
        aliases: &["role id", "role_id", "roleid", "role"] },
    FieldSpec { field: CanonicalField::DepartmentId, label: "Department ID", example: "1",
        aliases: &["department id", "department_id", "departmentid", "department", "dept id", "dept"] },
    FieldSpec { field: CanonicalField::DesignationId, label: "Designation ID", example: "3",
        aliases: &["designation id", "designation_id", "designationid", "designation"] },
    FieldSpec { field: CanonicalField::FirstName, label: "First Name", example: "Asha",
        aliases: &["first name", "first_name", "firstname", "name", "given name"] },
    FieldSpec { field: CanonicalField::LastName, label: "Last Name", example: "Verma",
        aliases: &["last name", "last_name", "lastname", "surname", "family name"] },
    FieldSpec { field: CanonicalField::FatherName, label: "Father Name", example: "Ramesh Verma",
        aliases: &["father name", "father_name", "fathername", "father's name"] },
    FieldSpec { field: CanonicalField::MotherName, label: "Mother Name", example: "Sunita Verma",
        aliases: &["mother name", "mother_name", "mothername", "mother's name"] },
    FieldSpec { field: CanonicalField::Email, label: "Email", example: "asha.verma@example.com",
        aliases: &["email", "e-mail", "email address", "email_address", "mail"] },
    FieldSpec { field: CanonicalField::Gender, label: "Gender", example: "female",
        aliases: &["gender", "sex"] },
    FieldSpec { field: CanonicalField::MaritalStatus, label: "Marital Status", example: "married",
        aliases: &["marital status", "marital_status", "maritalstatus"] },
    FieldSpec { field: CanonicalField::DateOfBirth, label: "Date of Birth (YYYY-MM-DD)", example: "1990-08-14",
        aliases: &["date of birth", "date_of_birth", "dateofbirth", "dob", "birth date", "birthdate"] },
    FieldSpec { field: CanonicalField::DateOfJoining, label: "Date of Joining (YYYY-MM-DD)", example: "2021-06-01",
        aliases: &["date of joining", "date_of_joining", "dateofjoining", "doj", "joining date", "join date"] },
    FieldSpec { field: CanonicalField::Phone, label: "Phone", example: "9876543210",
        aliases: &["phone", "phone number", "phone_number", "mobile", "mobile number", "contact", "contact number"] },
    FieldSpec { field: CanonicalField::EmergencyPhone, label: "Emergency Phone", example: "9876500000",
        aliases: &["emergency phone", "emergency_phone", "emergency contact", "emergency number"] },
    FieldSpec { field: CanonicalField::CurrentAddress, label: "Current Address", example: "12 MG Road, Pune",
        aliases: &["current address", "current_address", "address", "present address"] },
    FieldSpec { field: CanonicalField::PermanentAddress, label: "Permanent Address", example: "4 Lake View, Nagpur",
        aliases: &["permanent address", "permanent_address"] },
    FieldSpec { field: CanonicalField::Qualification, label: "Qualification", example: "M.Sc, B.Ed",
        aliases: &["qualification", "qualifications", "education"] },
    FieldSpec { field: CanonicalField::WorkExperience, label: "Work Experience", example: "5 years",
        aliases: &["work experience", "work_experience", "experience"] },
    FieldSpec { field: CanonicalField::Note, label: "Note", example: "Class teacher, grade 6",
        aliases: &["note", "notes", "remarks"] },
    FieldSpec { field: CanonicalField::EpfNo, label: "EPF No", example: "PF/2021/0042",
        aliases: &["epf no", "epf_no", "epf number", "epf", "pf no"] },
    FieldSpec { field: CanonicalField::BasicSalary, label: "Basic Salary", example: "45000",
        aliases: &["basic salary", "basic_salary", "basicsalary", "salary"] },
    FieldSpec { field: CanonicalField::ContractType, label: "Contract Type", example: "permanent",
        aliases: &["contract type", "contract_type", "contract"] },
    FieldSpec { field: CanonicalField::WorkShift, label: "Work Shift", example: "morning",
        aliases: &["work shift", "work_shift", "shift"] },
    FieldSpec { field: CanonicalField::WorkLocation, label: "Work Location", example: "Main Campus",
        aliases: &["work location", "work_location", "location"] },
    FieldSpec { field: CanonicalField::NumberOfLeaves, label: "Number of Leaves", example: "12",
        aliases: &["number of leaves", "number_of_leaves", "leaves", "no of leaves", "leave count"] },
    FieldSpec { field: CanonicalField::BankAccountName, label: "Bank Account Name", example: "Asha Verma",
        aliases: &["bank account name", "bank_account_name", "account name", "account holder", "account title"] },
    FieldSpec { field: CanonicalField::BankAccountNumber, label: "Bank Account Number", example: "001234567890",
        aliases: &["bank account number", "bank_account_number", "account number", "account no", "bank account no"] },
    FieldSpec { field: CanonicalField::BankName, label: "Bank Name", example: "State Bank of India",
        aliases: &["bank name", "bank_name", "bank"] },
    FieldSpec { field: CanonicalField::IfscCode, label: "IFSC Code", example: "SBIN0000123",
        aliases: &["ifsc code", "ifsc_code", "ifsc"] },
    FieldSpec { field: CanonicalField::BankBranch, label: "Bank Branch", example: "Shivaji Nagar",
        aliases: &["bank branch", "bank_branch", "branch", "branch name"] },
    FieldSpec { field: CanonicalField::FacebookUrl, label: "Facebook URL", example: "https://facebook.com/asha.verma",
        aliases: &["facebook url", "facebook_url", "facebook"] },
    FieldSpec { field: CanonicalField::TwitterUrl, label: "Twitter URL", example: "https://twitter.com/ashaverma",
        aliases: &["twitter url", "twitter_url", "twitter"] },
    FieldSpec { field: CanonicalField::LinkedinUrl, label: "LinkedIn URL", example: "https://linkedin.com/in/ashaverma",
        aliases: &["linkedin url", "linkedin_url", "linkedin"] },
    FieldSpec { field: CanonicalField::InstagramUrl, label: "Instagram URL", example: "https://instagram.com/ashaverma",
        aliases: &["instagram url", "instagram_url", "instagram"] },
];

impl CanonicalField {
    pub fn from_header(header: &str) -> Option<Self> {
        let header = normalize_header(header);

        FIELDS.iter()
            .find(|spec| spec.aliases.contains(&header.as_str()))
            .map(|spec| spec.field)
    }
}

/// Lowercase, drop a parenthetical hint such as `(YYYY-MM-DD)` and squeeze
/// whitespace runs.
fn normalize_header(header: &str) -> String {
    let header = header.trim().to_lowercase();
    let header = match header.find('(') {
        Some(idx) => &header[..idx],
        None => header.as_str(),
    };

    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps each header cell to the field its column feeds. Unrecognised or
/// blank headers map to `None` and their column is ignored.
pub fn parse_headers(row: &[Cell]) -> Vec<Option<CanonicalField>> {
    row.iter()
        .map(|cell| cell.text().and_then(|header| CanonicalField::from_header(&header)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn headers(titles: &[&str]) -> Vec<Option<CanonicalField>> {
        parse_headers(&titles.iter().map(|t| Cell::from_text(t)).collect::<Vec<_>>())
    }

    #[test]
    fn test_aliases() {
        assert_eq!(
            headers(&["Staff ID", "EMPLOYEE ID", " staffid ", "Role", "First  Name"]),
            vec![
                Some(CanonicalField::StaffId),
                Some(CanonicalField::StaffId),
                Some(CanonicalField::StaffId),
                Some(CanonicalField::RoleId),
                Some(CanonicalField::FirstName),
            ],
        );
    }

    #[test]
    fn test_parenthetical_suffix_is_ignored() {
        assert_eq!(
            headers(&["Date of Birth (YYYY-MM-DD)", "Basic Salary (INR)", "DOJ(dd/mm/yyyy)"]),
            vec![
                Some(CanonicalField::DateOfBirth),
                Some(CanonicalField::BasicSalary),
                Some(CanonicalField::DateOfJoining),
            ],
        );
    }

    #[test]
    fn test_unknown_headers_are_ignored() {
        assert_eq!(headers(&["Blood Group", "", "Staff ID"]), vec![None, None, Some(CanonicalField::StaffId)]);
        assert_eq!(parse_headers(&[Cell::Number(3.0), Cell::Empty]), vec![None, None]);
    }

    #[test]
    fn test_aliases_are_unambiguous() {
        let mut seen = HashSet::new();

        for spec in FIELDS {
            for alias in spec.aliases {
                assert_eq!(normalize_header(alias), *alias, "alias `{alias}` is not normalized");
                assert!(seen.insert(*alias), "alias `{alias}` is listed twice");
            }
        }
    }

    #[test]
    fn test_every_label_resolves_to_its_field() {
        for spec in FIELDS {
            assert_eq!(CanonicalField::from_header(spec.label), Some(spec.field), "label `{}`", spec.label);
        }
    }
}
