use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: [Faq; 4] = [
    Faq {
        question: "How can I request a demo of your LMS platform?",
        answer: "You can request a demo by filling out the contact form above or by emailing us directly at demo@edulearn.com. Our team will schedule a personalized demonstration based on your specific needs.",
    },
    Faq {
        question: "What kind of support do you offer to customers?",
        answer: "We provide 24/7 technical support, comprehensive documentation, video tutorials, and regular webinars. Our dedicated customer success team also offers personalized onboarding and training.",
    },
    Faq {
        question: "Is your LMS platform suitable for K-12 education?",
        answer: "Yes, our platform is designed to be flexible and can be customized for K-12 education, higher education, corporate training, and more. We offer specific features tailored to each educational level.",
    },
    Faq {
        question: "Can I integrate your LMS with other systems we use?",
        answer: "Our LMS platform offers robust API integration capabilities and pre-built connectors for popular education tools, student information systems, and communication platforms.",
    },
];
