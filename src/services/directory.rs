//! 目录服务
//!
//! 学生、公司、活动的只读列表和纯函数筛选。筛选结果总是源列表的子集，
//! 并保持源列表中的顺序。

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::{
    Company, CompanyQuery, Event, EventQuery, FacetsResponse, Student, StudentQuery,
};

/// 按谓词筛选
pub fn filter<T, P>(items: &[T], predicate: P) -> Vec<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
{
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

/// 不区分大小写的子串匹配；关键字为空时总是匹配
fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match normalized(needle) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// 精确匹配；条件为空时总是匹配
fn equals(value: &str, expected: Option<&str>) -> bool {
    normalized(expected).map_or(true, |e| value == e)
}

/// 列表包含；条件为空时总是匹配
fn includes(values: &[String], expected: Option<&str>) -> bool {
    normalized(expected).map_or(true, |e| values.iter().any(|v| v == e))
}

fn normalized(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl StudentQuery {
    pub fn matches(&self, student: &Student) -> bool {
        contains_ci(&student.name, self.q.as_deref())
            && equals(&student.major, self.major.as_deref())
            && equals(&student.university, self.university.as_deref())
            && includes(&student.skills, self.skill.as_deref())
    }
}

impl CompanyQuery {
    pub fn matches(&self, company: &Company) -> bool {
        contains_ci(&company.name, self.q.as_deref())
            && equals(&company.industry, self.industry.as_deref())
            && includes(&company.specialties, self.specialty.as_deref())
    }
}

impl EventQuery {
    pub fn matches(&self, event: &Event) -> bool {
        contains_ci(&event.title, self.q.as_deref())
            && equals(&event.event_type, self.event_type.as_deref())
            && equals(&event.company, self.company.as_deref())
    }
}

/// 去重并排序
fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values.cloned().collect::<BTreeSet<_>>().into_iter().collect()
}

/// 目录数据
pub struct Directory {
    students: Vec<Student>,
    companies: Vec<Company>,
    events: Vec<Event>,
}

impl Directory {
    pub fn new(students: Vec<Student>, companies: Vec<Company>, events: Vec<Event>) -> Self {
        Self {
            students,
            companies,
            events,
        }
    }

    /// 带示例数据的目录
    pub fn seeded() -> Self {
        Self::new(seed_students(), seed_companies(), seed_events())
    }

    pub fn students(&self, query: &StudentQuery) -> Vec<Student> {
        filter(&self.students, |s| query.matches(s))
    }

    pub fn companies(&self, query: &CompanyQuery) -> Vec<Company> {
        filter(&self.companies, |c| query.matches(c))
    }

    pub fn events(&self, query: &EventQuery) -> Vec<Event> {
        filter(&self.events, |e| query.matches(e))
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub fn facets(&self) -> FacetsResponse {
        FacetsResponse {
            majors: distinct(self.students.iter().map(|s| &s.major)),
            universities: distinct(self.students.iter().map(|s| &s.university)),
            skills: distinct(self.students.iter().flat_map(|s| s.skills.iter())),
            industries: distinct(self.companies.iter().map(|c| &c.industry)),
            specialties: distinct(self.companies.iter().flat_map(|c| c.specialties.iter())),
            event_types: distinct(self.events.iter().map(|e| &e.event_type)),
            event_companies: distinct(self.events.iter().map(|e| &e.company)),
        }
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::seeded()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn seed_students() -> Vec<Student> {
    let rows: [(&str, &str, &str, &str, u32, &[&str], &[&str], &str); 4] = [
        ("1", "Alice Wonderland", "Tech University", "Computer Science", 3, &["React", "Node.js", "Python"], &["AI", "Web Development"], "AW"),
        ("2", "Bob The Builder", "State College", "Mechanical Engineering", 4, &["AutoCAD", "SolidWorks"], &["Robotics", "3D Printing"], "BB"),
        ("3", "Charlie Brown", "Arts Institute", "Graphic Design", 2, &["Photoshop", "Illustrator"], &["UI/UX", "Branding"], "CB"),
        ("4", "Diana Prince", "Global University", "International Relations", 3, &["Diplomacy", "Spanish", "French"], &["Global Politics", "Non-profits"], "DP"),
    ];

    rows.into_iter()
        .map(|(id, name, university, major, year, skills, interests, initials)| Student {
            id: id.to_string(),
            name: name.to_string(),
            university: university.to_string(),
            major: major.to_string(),
            year,
            skills: strings(skills),
            interests: strings(interests),
            avatar_url: format!("https://placehold.co/100x100.png?text={}", initials),
        })
        .collect()
}

fn seed_companies() -> Vec<Company> {
    let rows: [(&str, &str, &str, &str, &[&str], &str); 4] = [
        ("1", "Tech Solutions Inc.", "Technology", "Leading provider of innovative tech solutions.", &["Software Development", "Cloud Computing"], "TS"),
        ("2", "Green Energy Co.", "Renewable Energy", "Pioneering sustainable energy alternatives.", &["Solar Power", "Wind Energy"], "GE"),
        ("3", "HealthFirst Group", "Healthcare", "Dedicated to improving patient care through technology.", &["Telemedicine", "Medical Devices"], "HF"),
        ("4", "EduGrowth Platforms", "Education Technology", "Transforming learning with digital tools.", &["E-learning", "AI Tutoring"], "EP"),
    ];

    rows.into_iter()
        .map(|(id, name, industry, description, specialties, initials)| Company {
            id: id.to_string(),
            name: name.to_string(),
            industry: industry.to_string(),
            description: description.to_string(),
            logo_url: format!("https://placehold.co/100x100.png?text={}", initials),
            specialties: strings(specialties),
        })
        .collect()
}

fn seed_events() -> Vec<Event> {
    let rows: [(&str, &str, &str, &str, (i32, u32, u32), &str, &str); 4] = [
        ("1", "AI & Machine Learning Workshop", "Tech Solutions Inc.", "1", (2024, 9, 20), "Workshop", "An interactive workshop on the fundamentals of AI and ML."),
        ("2", "Career Fair: Green Energy", "Green Energy Co.", "2", (2024, 10, 5), "Career Fair", "Meet recruiters and learn about careers in renewable energy."),
        ("3", "Networking Night: Healthcare Tech", "HealthFirst Group", "3", (2024, 9, 28), "Networking", "Connect with professionals in the healthcare technology sector."),
        ("4", "Intro to EdTech Innovations", "EduGrowth Platforms", "4", (2024, 10, 12), "Webinar", "Discover the latest trends and tools in education technology."),
    ];

    rows.into_iter()
        .filter_map(|(id, title, company, company_id, (y, m, d), event_type, description)| {
            Some(Event {
                id: id.to_string(),
                title: title.to_string(),
                company: company.to_string(),
                company_id: company_id.to_string(),
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                event_type: event_type.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_subset_in_source_order() {
        let items = vec![5, 1, 4, 2, 3];
        assert_eq!(filter(&items, |n| n % 2 == 1), vec![5, 1, 3]);
        assert!(filter(&items, |_| false).is_empty());
        assert_eq!(filter(&items, |_| true), items);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let dir = Directory::seeded();
        assert_eq!(dir.students(&StudentQuery::default()).len(), 4);
        assert_eq!(dir.companies(&CompanyQuery::default()).len(), 4);
        assert_eq!(dir.events(&EventQuery::default()).len(), 4);
    }

    #[test]
    fn test_student_search_is_case_insensitive() {
        let dir = Directory::seeded();
        let query = StudentQuery {
            q: Some("ALICE".to_string()),
            ..Default::default()
        };
        let found = dir.students(&query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alice Wonderland");
    }

    #[test]
    fn test_student_filters_combine() {
        let dir = Directory::seeded();
        let query = StudentQuery {
            university: Some("Tech University".to_string()),
            skill: Some("Python".to_string()),
            ..Default::default()
        };
        assert_eq!(dir.students(&query).len(), 1);

        let query = StudentQuery {
            major: Some("Graphic Design".to_string()),
            skill: Some("Python".to_string()),
            ..Default::default()
        };
        assert!(dir.students(&query).is_empty());
    }

    #[test]
    fn test_blank_criteria_do_not_filter() {
        let dir = Directory::seeded();
        let query = CompanyQuery {
            q: Some("   ".to_string()),
            industry: Some(String::new()),
            specialty: None,
        };
        assert_eq!(dir.companies(&query).len(), 4);
    }

    #[test]
    fn test_company_specialty_and_event_type() {
        let dir = Directory::seeded();
        let companies = dir.companies(&CompanyQuery {
            specialty: Some("AI Tutoring".to_string()),
            ..Default::default()
        });
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "EduGrowth Platforms");

        let events = dir.events(&EventQuery {
            event_type: Some("Webinar".to_string()),
            ..Default::default()
        });
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2024, 10, 12).unwrap());
    }

    #[test]
    fn test_facets_are_sorted_and_distinct() {
        let dir = Directory::seeded();
        let facets = dir.facets();
        assert_eq!(facets.majors.len(), 4);
        assert_eq!(facets.universities[0], "Arts Institute");
        assert!(facets.skills.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(facets.event_types.len(), 4);
    }

    #[test]
    fn test_lookup_by_id() {
        let dir = Directory::seeded();
        assert_eq!(dir.student("2").map(|s| s.name.as_str()), Some("Bob The Builder"));
        assert!(dir.company("99").is_none());
    }
}
