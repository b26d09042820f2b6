use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::models::leave::{LeaveApplicationView, LeaveStatus};
use crate::models::report::{EmployeeLeaveCount, MonthlyStats};

const TOP_EMPLOYEES: usize = 5;

/// Aggregates the applications whose start date falls in `year`/`month`.
pub fn monthly_stats(views: &[LeaveApplicationView], year: i32, month: u8) -> MonthlyStats {
    let in_month = views.iter().filter(|v| {
        let start = v.application.start_date;
        start.year() == year && u8::from(start.month()) == month
    });

    let mut stats = MonthlyStats {
        year,
        month,
        total: 0,
        approved: 0,
        pending: 0,
        rejected: 0,
        by_department: BTreeMap::new(),
        by_leave_type: BTreeMap::new(),
        top_employees: Vec::new(),
    };
    let mut per_employee: HashMap<Uuid, EmployeeLeaveCount> = HashMap::new();

    for v in in_month {
        stats.total += 1;
        match v.application.status {
            LeaveStatus::Approved => stats.approved += 1,
            LeaveStatus::Pending => stats.pending += 1,
            LeaveStatus::Rejected => stats.rejected += 1,
        }
        *stats
            .by_department
            .entry(v.employee_department.clone())
            .or_insert(0) += 1;
        *stats.by_leave_type.entry(v.application.leave_type).or_insert(0) += 1;
        per_employee
            .entry(v.application.employee_id)
            .or_insert_with(|| EmployeeLeaveCount {
                employee_id: v.application.employee_id,
                name: v.employee_name.clone(),
                department: v.employee_department.clone(),
                applications: 0,
            })
            .applications += 1;
    }

    let mut top: Vec<EmployeeLeaveCount> = per_employee.into_values().collect();
    top.sort_by(|a, b| b.applications.cmp(&a.applications).then_with(|| a.name.cmp(&b.name)));
    top.truncate(TOP_EMPLOYEES);
    stats.top_employees = top;
    stats
}
