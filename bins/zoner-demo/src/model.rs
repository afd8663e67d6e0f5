//! Persistence and wire models of a small company graph.

use zoner_api::{Shared, Zoner};

#[derive(Zoner, Default)]
#[zoner(to = CompanyWire)]
pub struct Company {
    #[zoner(write_cache = "companyId")]
    pub id: String,
    pub name: String,
    pub head: Option<Shared<Employee>>,
    #[zoner(rename = "employees")]
    pub staff: Vec<Shared<Employee>>,
}

#[derive(Zoner, Default)]
pub struct Employee {
    #[zoner(read_cache = "companyId", rename = "company_id")]
    pub comp_id: String,
    #[zoner(rename = "head_name")]
    pub name: String,
    pub designation: Option<Shared<Designation>>,
}

#[derive(Zoner, Default)]
pub struct Designation {
    #[zoner(rename = "head_title")]
    pub title: String,
    pub grade: u8,
}

#[derive(Zoner, Default)]
pub struct CompanyWire {
    pub id: String,
    pub name: String,
    pub head: Option<Shared<Employee>>,
    pub employees: Vec<Shared<Employee>>,
    pub company_id: String,
    pub head_name: String,
    pub designation: Option<Shared<Designation>>,
    pub head_title: String,
    pub grade: u8,
}

fn employee(name: String, title: &str, grade: u8) -> Shared<Employee> {
    Shared::new(Employee {
        comp_id: String::new(),
        name,
        designation: Some(Shared::new(Designation {
            title: title.to_string(),
            grade,
        })),
    })
}

/// Company `id` with a head and `employees` staff members, none of which
/// know their company id yet.
pub fn sample(id: &str, employees: usize) -> Shared<Company> {
    let staff = (1..=employees)
        .map(|i| employee(format!("employee-{i}"), "engineer", 1 + (i % 3) as u8))
        .collect();
    Shared::new(Company {
        id: id.to_string(),
        name: format!("Company {id}"),
        head: Some(employee("head".to_string(), "director", 9)),
        staff,
    })
}
