//! Option tables for choice fields

pub const GENDERS: &[&str] = &["male", "female", "other"];

pub const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

pub const CATEGORIES: &[&str] = &["general", "obc", "sc", "st", "ews"];

pub const STATES: &[&str] = &[
    "andhra-pradesh",
    "arunachal-pradesh",
    "assam",
    "bihar",
    "chhattisgarh",
    "goa",
    "gujarat",
    "haryana",
    "himachal-pradesh",
    "jharkhand",
    "karnataka",
    "kerala",
    "madhya-pradesh",
    "maharashtra",
    "manipur",
    "meghalaya",
    "mizoram",
    "nagaland",
    "odisha",
    "punjab",
    "rajasthan",
    "sikkim",
    "tamil-nadu",
    "telangana",
    "tripura",
    "uttar-pradesh",
    "uttarakhand",
    "west-bengal",
];

pub const BOARDS: &[&str] = &["cbse", "icse", "state-board", "ib", "other"];

pub const STREAMS: &[&str] = &["science", "commerce", "arts"];

pub const GRADE_TYPES: &[&str] = &["percentage", "cgpa", "grade"];

pub const ENTRANCE_EXAMS: &[&str] = &[
    "jee-main",
    "jee-advanced",
    "neet",
    "bitsat",
    "comedk",
    "mht-cet",
    "kcet",
    "eamcet",
    "wbjee",
    "other",
    "none",
];

pub const COURSES: &[&str] = &[
    "btech", "bsc", "bcom", "ba", "bba", "bca", "mtech", "msc", "mcom", "mba",
];

pub const ADMISSION_TYPES: &[&str] = &["merit", "entrance", "management", "nri", "sports"];

pub const CAMPUSES: &[&str] = &[
    "main-campus",
    "north-campus",
    "south-campus",
    "west-campus",
    "east-campus",
];

const ENGINEERING: &[&str] = &[
    "computer-science",
    "information-technology",
    "electronics-communication",
    "electrical",
    "mechanical",
    "civil",
    "chemical",
    "aerospace",
    "biotechnology",
    "automobile",
];

const SCIENCE: &[&str] = &[
    "physics",
    "chemistry",
    "mathematics",
    "biology",
    "computer-science",
    "biotechnology",
    "microbiology",
    "environmental-science",
];

const COMMERCE: &[&str] = &[
    "general",
    "accounting-finance",
    "banking-insurance",
    "taxation",
    "international-business",
];

const ARTS: &[&str] = &[
    "english",
    "history",
    "political-science",
    "economics",
    "psychology",
    "sociology",
    "philosophy",
    "journalism",
];

const MANAGEMENT: &[&str] = &[
    "general",
    "marketing",
    "finance",
    "human-resources",
    "international-business",
    "operations",
];

const COMPUTER_APPLICATIONS: &[&str] = &[
    "general",
    "web-development",
    "mobile-app-development",
    "data-science",
    "cyber-security",
];

/// Specializations offered for a course; empty for unknown courses
pub fn specializations_for(course: &str) -> &'static [&'static str] {
    match course {
        "btech" | "mtech" => ENGINEERING,
        "bsc" | "msc" => SCIENCE,
        "bcom" | "mcom" => COMMERCE,
        "ba" => ARTS,
        "bba" | "mba" => MANAGEMENT,
        "bca" => COMPUTER_APPLICATIONS,
        _ => &[],
    }
}
