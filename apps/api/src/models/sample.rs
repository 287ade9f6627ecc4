use super::resume::{
    Achievement, Activity, Education, Internship, PersonalDetails, Position, Project, ResumeData,
    Skill,
};

pub const PLACEHOLDER_PHOTO: &str = "https://via.placeholder.com/130x140.png?text=";
pub const PLACEHOLDER_LOGO: &str = "https://via.placeholder.com/144x144.png?text=";

/// True for the stock images a fresh resume starts with.
pub fn is_placeholder(url: &str) -> bool {
    url.contains("via.placeholder.com")
}

fn s(value: &str) -> String {
    value.to_string()
}

/// The resume a new preview session starts from.
pub fn sample_resume() -> ResumeData {
    ResumeData {
        personal_details: PersonalDetails {
            name: s("JOHN DOE"),
            photo: s(PLACEHOLDER_PHOTO),
            degree: s("B.Tech - Computer Science and Engineering"),
            gender: s("Male"),
            dob: s("06/09/2005"),
            email: s("tp@nitt.edu"),
            contact: s("+91-431-2501081"),
            logo: s(PLACEHOLDER_LOGO),
        },
        education: vec![
            Education {
                id: s("edu1"),
                year: s("2023-Present"),
                degree: s("B.Tech- CSE"),
                institution: s("NIT, Trichy"),
                grade: s("9.2"),
            },
            Education {
                id: s("edu2"),
                year: s("2023"),
                degree: s("Class XII"),
                institution: s("Delhi Public School, R. K. Puram"),
                grade: s("97.2%"),
            },
            Education {
                id: s("edu3"),
                year: s("2021"),
                degree: s("Class X"),
                institution: s("Delhi Public School, R. K. Puram"),
                grade: s("98.8%"),
            },
        ],
        internships: vec![
            Internship {
                id: s("int1"),
                title: s("Research Internship at Indian Institute of Technology Guwahati"),
                date: s("Jun 2025 - Present"),
                description: s(
                    "Working as a research intern on the project Air to Water Generator. I simulated a model \
                     in Dymola to extract water from humid air with the purpose of satisfying water \
                     requirements in coastal regions.",
                ),
            },
            Internship {
                id: s("int2"),
                title: s("Internship at AHODS Technologies Private Limited"),
                date: s("Jun 2025 - Aug 2025"),
                description: s(
                    "Collaborated with IIT Delhi on a project to enhance onboard hydrogen production for \
                     vehicles. Conducted a literature review on electrolysis methods to propose \
                     cost-effective solutions.",
                ),
            },
        ],
        achievements: vec![
            Achievement {
                id: s("ach1"),
                description: s(
                    "Secured <b>Rank 2</b> in Cyber Olympiad(IFCO) in the Zonal level conducted by \
                     International Olympiad Foundation in 2022.",
                ),
            },
            Achievement {
                id: s("ach2"),
                description: s(
                    "Achieved <b>Top 5%</b> in the national competitive programming contest CodeSprint 2023.",
                ),
            },
            Achievement {
                id: s("ach3"),
                description: s("<b>IBPC Meritorious Student Award</b> in 2021 and 2023."),
            },
        ],
        projects: vec![
            Project {
                id: s("proj1"),
                name: s("Smart Inventory System"),
                date: s("January 2025 - March 2025"),
                description: s(
                    "Designed and deployed a comprehensive inventory management system using the MERN \
                     stack to streamline stock tracking for local businesses. Implemented real-time data \
                     visualization dashboards using Chart.js to analyze sales trends and predict future \
                     stock requirements with 95% accuracy. Integrated a secure payment gateway and \
                     role-based access control to ensure data privacy and secure transactions for over \
                     500 active users.",
                ),
            },
            Project {
                id: s("proj2"),
                name: s("Weather App"),
                date: s("May 2025"),
                description: s(
                    "Developed a Weather App that displays the weather of 3 cities on the home page. It \
                     also displays the weather of any city searched for in the search box. It displays \
                     temperature, feels like temperature, humidity, and wind speed. The front end is made \
                     using HTML, CSS, and JavaScript. The API used to get weather data is Weather API by \
                     WeatherAPI.com.",
                ),
            },
            Project {
                id: s("proj3"),
                name: s("Chatty"),
                date: s("June 2025"),
                description: s(
                    "Built Chatty, a real-time chat application with one-on-one messaging and online \
                     status, using the MERN stack with Socket.io, JWT for security, and Zustand for state \
                     management. Optimized database queries and implemented a caching layer, improving \
                     message delivery speed by 30%.",
                ),
            },
        ],
        skills: vec![
            Skill {
                id: s("skill1"),
                category: s("Programming Languages"),
                skills: s("C++, C, JavaScript, HTML, CSS"),
            },
            Skill {
                id: s("skill2"),
                category: s("Frameworks/Libraries"),
                skills: s("React.js, Socket.io"),
            },
            Skill {
                id: s("skill3"),
                category: s("Tools"),
                skills: s("Visual Studio Code, Git, GitHub, Node.js"),
            },
            Skill {
                id: s("skill4"),
                category: s("Other Softwares"),
                skills: s("Figma, Photoshop"),
            },
        ],
        positions: vec![
            Position {
                id: s("pos1"),
                title: s("Associate, The Product Folks NITT"),
                date: s("May 2025-Present"),
                description: s(
                    "As a member of the Product Management Club of NIT Trichy, I take part in upskilling \
                     sessions and work on case studies, projects, and product decks.",
                ),
            },
            Position {
                id: s("pos2"),
                title: s("Manager, Marketing, Festember"),
                date: s("Mar 2024 - Present"),
                description: s(
                    "Worked as a Marketing Manager of Festember'24, the annual cultural festival of NIT \
                     Trichy. Executed the task of establishing partnerships with various companies through \
                     effective communication and negotiation strategies.",
                ),
            },
        ],
        activities: vec![
            Activity {
                id: s("act1"),
                title: s("Social Activities"),
                description: s(
                    "A volunteer under the HumaNITTy programme, NIT Trichy chapter, which aims at visiting \
                     local old age homes and orphanages and spending quality time with them.\n\
                     Organized a campus-wide blood donation camp in collaboration with the Red Cross \
                     Society, collecting over 200 units of blood.",
                ),
            },
            Activity {
                id: s("act2"),
                title: s("Cultural Activities"),
                description: s(
                    "Secured 1st position in Pixel Pirates event of Pragyan in 2023.\n\
                     DAN 1 - Black Belt Holder in Karate",
                ),
            },
            Activity {
                id: s("act3"),
                title: s("Sports Activities"),
                description: s("Participated in 10K sportsfete marathon"),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_starts_with_placeholder_images() {
        let data = sample_resume();
        assert!(is_placeholder(&data.personal_details.photo));
        assert!(is_placeholder(&data.personal_details.logo));
        assert!(!is_placeholder("data:image/jpeg;base64,AAAA"));
    }

    #[test]
    fn test_sample_entry_ids_are_unique() {
        let data = sample_resume();
        let mut ids: Vec<&str> = data
            .education
            .iter()
            .map(|e| e.id.as_str())
            .chain(data.projects.iter().map(|p| p.id.as_str()))
            .chain(data.activities.iter().map(|a| a.id.as_str()))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
